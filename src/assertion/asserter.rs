use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use regex::Regex;

use crate::assertion::evaluator::{Verdict, evaluate_assertion};
use crate::assertion::types::{
    AssertError, AssertKind, AssertValue, CodeOutcome, CompareOp, ExceptionMatcher, InclusionMode,
    Subject,
};
use crate::suite::test::Recorder;
use crate::suite::types::{SourceLocation, TestOutcome, panic_message};

/// 值断言入口
///
/// `TestHandle::that` 每次调用产生一个新实例，一次糖方法调用
/// 消费一个实例，结论直接写进所属测试的记录器
pub struct Asserter {
    actual: AssertValue,
    recorder: Arc<Recorder>,
}

impl Asserter {
    pub(crate) fn new(actual: AssertValue, recorder: Arc<Recorder>) -> Self {
        Self { actual, recorder }
    }

    /// 深结构相等
    #[track_caller]
    pub fn is_equal_to(self, expected: impl Into<AssertValue>) {
        self.check(AssertKind::Equality {
            expected: expected.into(),
            negated: false,
        });
    }

    #[track_caller]
    pub fn is_not_equal_to(self, expected: impl Into<AssertValue>) {
        self.check(AssertKind::Equality {
            expected: expected.into(),
            negated: true,
        });
    }

    /// 同一性：基本类型按值，复合值按共享分配
    #[track_caller]
    pub fn is_identical_to(self, expected: impl Into<AssertValue>) {
        self.check(AssertKind::Identity {
            expected: expected.into(),
            negated: false,
        });
    }

    #[track_caller]
    pub fn is_not_identical_to(self, expected: impl Into<AssertValue>) {
        self.check(AssertKind::Identity {
            expected: expected.into(),
            negated: true,
        });
    }

    /// 字符串正则匹配；模式非法时记录为 error
    #[track_caller]
    pub fn matches(self, pattern: &str) {
        let location = SourceLocation::caller();
        match Regex::new(pattern) {
            Ok(regex) => self.check_at(AssertKind::Match { pattern: regex }, location),
            Err(error) => self.recorder.record(TestOutcome::error(
                AssertError::from(error).to_string(),
                Some(location),
            )),
        }
    }

    /// 严格布尔判定，非布尔值不会被当成 truthy
    #[track_caller]
    pub fn is_true(self) {
        self.check(AssertKind::Truthiness { expected: true });
    }

    #[track_caller]
    pub fn is_false(self) {
        self.check(AssertKind::Truthiness { expected: false });
    }

    #[track_caller]
    pub fn is_null(self) {
        self.check(AssertKind::Equality {
            expected: AssertValue::Null,
            negated: false,
        });
    }

    #[track_caller]
    pub fn is_not_null(self) {
        self.check(AssertKind::Equality {
            expected: AssertValue::Null,
            negated: true,
        });
    }

    /// 缺失值判定（`Option::None` 转换而来的哨兵）
    #[track_caller]
    pub fn is_absent(self) {
        self.check(AssertKind::Equality {
            expected: AssertValue::Absent,
            negated: false,
        });
    }

    /// 存在判定：不是缺失值哨兵即通过
    #[track_caller]
    pub fn is_present(self) {
        self.check(AssertKind::Equality {
            expected: AssertValue::Absent,
            negated: true,
        });
    }

    /// 列表含元素（深相等），或字符串含子串
    #[track_caller]
    pub fn includes(self, element: impl Into<AssertValue>) {
        self.check(AssertKind::Inclusion {
            mode: InclusionMode::Includes(element.into()),
        });
    }

    #[track_caller]
    pub fn does_not_include(self, element: impl Into<AssertValue>) {
        self.check(AssertKind::Inclusion {
            mode: InclusionMode::DoesNotInclude(element.into()),
        });
    }

    /// 元素恰好一一对应，不计顺序
    #[track_caller]
    pub fn includes_exactly<V, I>(self, elements: I)
    where
        V: Into<AssertValue>,
        I: IntoIterator<Item = V>,
    {
        self.check(AssertKind::Inclusion {
            mode: InclusionMode::IncludesExactly(
                elements.into_iter().map(Into::into).collect(),
            ),
        });
    }

    #[track_caller]
    pub fn is_empty(self) {
        self.check(AssertKind::Inclusion {
            mode: InclusionMode::Empty,
        });
    }

    #[track_caller]
    pub fn is_not_empty(self) {
        self.check(AssertKind::Inclusion {
            mode: InclusionMode::NotEmpty,
        });
    }

    #[track_caller]
    pub fn is_greater_than(self, bound: impl Into<AssertValue>) {
        self.check_numeric(CompareOp::Greater, bound);
    }

    #[track_caller]
    pub fn is_greater_or_equal_to(self, bound: impl Into<AssertValue>) {
        self.check_numeric(CompareOp::GreaterOrEqual, bound);
    }

    #[track_caller]
    pub fn is_less_than(self, bound: impl Into<AssertValue>) {
        self.check_numeric(CompareOp::Less, bound);
    }

    #[track_caller]
    pub fn is_less_or_equal_to(self, bound: impl Into<AssertValue>) {
        self.check_numeric(CompareOp::LessOrEqual, bound);
    }

    /// 指定小数位数内的近似相等
    #[track_caller]
    pub fn is_near_to(self, bound: impl Into<AssertValue>, precision: u32) {
        self.check_numeric(CompareOp::NearTo(precision), bound);
    }

    #[track_caller]
    fn check_numeric(self, op: CompareOp, bound: impl Into<AssertValue>) {
        let location = SourceLocation::caller();
        match bound.into() {
            AssertValue::Number(n) => {
                self.check_at(AssertKind::NumericCompare { op, bound: n }, location)
            }
            other => self.recorder.record(TestOutcome::error(
                AssertError::TypeMismatch {
                    expected: "number".to_string(),
                    actual: other.type_name().to_string(),
                }
                .to_string(),
                Some(location),
            )),
        }
    }

    #[track_caller]
    fn check(self, kind: AssertKind) {
        self.check_at(kind, SourceLocation::caller());
    }

    fn check_at(self, kind: AssertKind, location: SourceLocation) {
        let subject = Subject::Value(self.actual);
        record_verdict(&self.recorder, &kind, &subject, location);
    }
}

/// 代码块断言入口
///
/// `TestHandle::running` 先执行闭包并捕获其结果（含 panic），
/// 再由 raises / does_not_raise 对捕获结果下结论
pub struct CodeAsserter {
    outcome: CodeOutcome,
    recorder: Arc<Recorder>,
}

impl CodeAsserter {
    pub(crate) fn run<F>(code: F, recorder: Arc<Recorder>) -> Self
    where
        F: FnOnce() -> anyhow::Result<()>,
    {
        let outcome = match catch_unwind(AssertUnwindSafe(code)) {
            Ok(Ok(())) => CodeOutcome::Completed,
            Ok(Err(error)) => CodeOutcome::Raised(format!("{error:#}")),
            Err(payload) => CodeOutcome::Raised(panic_message(payload)),
        };
        Self { outcome, recorder }
    }

    /// 期望抛出消息完全相等的异常
    #[track_caller]
    pub fn raises(self, expected_message: impl Into<String>) {
        self.check(AssertKind::ExceptionExpectation {
            matcher: Some(ExceptionMatcher::Exact(expected_message.into())),
            negated: false,
        });
    }

    /// 期望抛出消息匹配正则的异常
    #[track_caller]
    pub fn raises_matching(self, pattern: &str) {
        let location = SourceLocation::caller();
        match Regex::new(pattern) {
            Ok(regex) => self.check_at(
                AssertKind::ExceptionExpectation {
                    matcher: Some(ExceptionMatcher::Pattern(regex)),
                    negated: false,
                },
                location,
            ),
            Err(error) => self.recorder.record(TestOutcome::error(
                AssertError::from(error).to_string(),
                Some(location),
            )),
        }
    }

    /// 期望什么都不抛出
    #[track_caller]
    pub fn does_not_raise(self) {
        self.check(AssertKind::ExceptionExpectation {
            matcher: None,
            negated: true,
        });
    }

    #[track_caller]
    fn check(self, kind: AssertKind) {
        self.check_at(kind, SourceLocation::caller());
    }

    fn check_at(self, kind: AssertKind, location: SourceLocation) {
        let subject = Subject::Code(self.outcome);
        record_verdict(&self.recorder, &kind, &subject, location);
    }
}

fn record_verdict(
    recorder: &Recorder,
    kind: &AssertKind,
    subject: &Subject,
    location: SourceLocation,
) {
    match evaluate_assertion(kind, subject) {
        Ok(Verdict::Pass) => recorder.record(TestOutcome::Success),
        Ok(Verdict::Fail(message)) => {
            recorder.record(TestOutcome::failure(message, Some(location)))
        }
        Err(error) => recorder.record(TestOutcome::error(error.to_string(), Some(location))),
    }
}
