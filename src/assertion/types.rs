use std::collections::BTreeMap;
use std::sync::Arc;

use regex::Regex;

/// 断言引擎内部错误
///
/// 这类错误不是"断言不成立"，而是断言本身无法求值（类型不匹配、
/// 非法模式等），会被记录为测试的 error 结果而不是 failure
#[derive(Debug, thiserror::Error)]
pub enum AssertError {
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("Invalid subject: {0}")]
    InvalidSubject(String),
}

/// 断言值
///
/// 动态值模型：`Absent` 是"缺少值"哨兵，与 `Null` 不同。
/// 复合值（List/Object）通过共享分配承载同一性：分别构造的两个
/// 结构相等的复合值相等但不同一
#[derive(Debug, Clone)]
pub enum AssertValue {
    /// 缺失值哨兵
    Absent,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Arc<Vec<AssertValue>>),
    /// BTreeMap 保证键序稳定，渲染结果可复现
    Object(Arc<BTreeMap<String, AssertValue>>),
}

impl AssertValue {
    /// 由可转换元素构造列表
    pub fn list<V, I>(items: I) -> Self
    where
        V: Into<AssertValue>,
        I: IntoIterator<Item = V>,
    {
        AssertValue::List(Arc::new(items.into_iter().map(Into::into).collect()))
    }

    /// 由键值对构造对象
    pub fn object<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<AssertValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        AssertValue::Object(Arc::new(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        ))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            AssertValue::Absent => "absent",
            AssertValue::Null => "null",
            AssertValue::Bool(_) => "boolean",
            AssertValue::Number(_) => "number",
            AssertValue::String(_) => "string",
            AssertValue::List(_) => "list",
            AssertValue::Object(_) => "object",
        }
    }

    /// 深结构相等：复合值逐元素/逐字段递归比较
    pub fn deep_equals(&self, other: &AssertValue) -> bool {
        match (self, other) {
            (AssertValue::Absent, AssertValue::Absent) => true,
            (AssertValue::Null, AssertValue::Null) => true,
            (AssertValue::Bool(a), AssertValue::Bool(b)) => a == b,
            (AssertValue::Number(a), AssertValue::Number(b)) => numbers_equal(*a, *b),
            (AssertValue::String(a), AssertValue::String(b)) => a == b,
            (AssertValue::List(a), AssertValue::List(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.deep_equals(y))
            }
            (AssertValue::Object(a), AssertValue::Object(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(key, value)| b.get(key).is_some_and(|w| value.deep_equals(w)))
            }
            _ => false,
        }
    }

    /// 同一性比较
    ///
    /// 基本类型按值比较，复合值按共享分配比较。
    /// `None` 表示不可判定：两个缺失值之间的同一性没有意义
    pub fn identical_to(&self, other: &AssertValue) -> Option<bool> {
        match (self, other) {
            (AssertValue::Absent, AssertValue::Absent) => None,
            (AssertValue::Null, AssertValue::Null) => Some(true),
            (AssertValue::Bool(a), AssertValue::Bool(b)) => Some(a == b),
            (AssertValue::Number(a), AssertValue::Number(b)) => Some(a == b),
            (AssertValue::String(a), AssertValue::String(b)) => Some(a == b),
            (AssertValue::List(a), AssertValue::List(b)) => Some(Arc::ptr_eq(a, b)),
            (AssertValue::Object(a), AssertValue::Object(b)) => Some(Arc::ptr_eq(a, b)),
            _ => Some(false),
        }
    }
}

/// 数值相等：允许浮点误差，同时覆盖无穷等特殊值
fn numbers_equal(a: f64, b: f64) -> bool {
    a == b || (a - b).abs() < f64::EPSILON
}

impl From<bool> for AssertValue {
    fn from(value: bool) -> Self {
        AssertValue::Bool(value)
    }
}

impl From<i32> for AssertValue {
    fn from(value: i32) -> Self {
        AssertValue::Number(value as f64)
    }
}

impl From<i64> for AssertValue {
    fn from(value: i64) -> Self {
        AssertValue::Number(value as f64)
    }
}

impl From<u32> for AssertValue {
    fn from(value: u32) -> Self {
        AssertValue::Number(value as f64)
    }
}

impl From<usize> for AssertValue {
    fn from(value: usize) -> Self {
        AssertValue::Number(value as f64)
    }
}

impl From<f64> for AssertValue {
    fn from(value: f64) -> Self {
        AssertValue::Number(value)
    }
}

impl From<f32> for AssertValue {
    fn from(value: f32) -> Self {
        AssertValue::Number(value as f64)
    }
}

impl From<&str> for AssertValue {
    fn from(value: &str) -> Self {
        AssertValue::String(value.to_string())
    }
}

impl From<String> for AssertValue {
    fn from(value: String) -> Self {
        AssertValue::String(value)
    }
}

/// `None` 映射为缺失值哨兵
impl<T: Into<AssertValue>> From<Option<T>> for AssertValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(inner) => inner.into(),
            None => AssertValue::Absent,
        }
    }
}

impl<T: Into<AssertValue>> From<Vec<T>> for AssertValue {
    fn from(value: Vec<T>) -> Self {
        AssertValue::list(value)
    }
}

/// 支持用 `serde_json::json!` 字面量搭建测试值
impl From<serde_json::Value> for AssertValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => AssertValue::Null,
            serde_json::Value::Bool(b) => AssertValue::Bool(b),
            serde_json::Value::Number(n) => AssertValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => AssertValue::String(s),
            serde_json::Value::Array(items) => AssertValue::list(items),
            serde_json::Value::Object(entries) => AssertValue::object(entries),
        }
    }
}

/// 断言算子：闭合的七种比较语义
///
/// 所有断言糖方法最终都落到这组带标签的变体上，由
/// `evaluate_assertion` 单点分发求值
#[derive(Debug, Clone)]
pub enum AssertKind {
    /// 深结构相等
    Equality { expected: AssertValue, negated: bool },
    /// 同一性（基本类型按值，复合值按分配）
    Identity { expected: AssertValue, negated: bool },
    /// 字符串正则匹配
    Match { pattern: Regex },
    /// 严格布尔判定
    Truthiness { expected: bool },
    /// 包含与空判定
    Inclusion { mode: InclusionMode },
    /// 数值比较
    NumericCompare { op: CompareOp, bound: f64 },
    /// 异常期望，针对代码块的执行结果
    ExceptionExpectation {
        matcher: Option<ExceptionMatcher>,
        negated: bool,
    },
}

/// 包含类断言的具体形态
#[derive(Debug, Clone)]
pub enum InclusionMode {
    Includes(AssertValue),
    DoesNotInclude(AssertValue),
    /// 元素恰好一一对应，不计顺序
    IncludesExactly(Vec<AssertValue>),
    Empty,
    NotEmpty,
}

/// 数值比较运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
    /// 指定小数位数内的近似相等
    NearTo(u32),
}

/// 异常消息匹配方式
#[derive(Debug, Clone)]
pub enum ExceptionMatcher {
    /// 消息完全相等
    Exact(String),
    /// 消息正则匹配
    Pattern(Regex),
}

impl ExceptionMatcher {
    pub fn matches(&self, raised: &str) -> bool {
        match self {
            ExceptionMatcher::Exact(expected) => expected == raised,
            ExceptionMatcher::Pattern(pattern) => pattern.is_match(raised),
        }
    }

    /// 渲染为失败消息里的期望描述
    pub fn describe(&self) -> String {
        match self {
            ExceptionMatcher::Exact(expected) => format!("\"{}\"", expected),
            ExceptionMatcher::Pattern(pattern) => format!("/{}/", pattern.as_str()),
        }
    }
}

/// 断言主体：一个值，或一段已执行代码的捕获结果
#[derive(Debug, Clone)]
pub enum Subject {
    Value(AssertValue),
    Code(CodeOutcome),
}

/// 代码块执行的捕获结果
#[derive(Debug, Clone)]
pub enum CodeOutcome {
    /// 正常跑完
    Completed,
    /// 抛出了错误或 panic，携带消息文本
    Raised(String),
}
