use std::any::Any;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::i18n::Message;
use crate::suite::suite::TestSuite;
use crate::suite::test::TestHandle;

/// 测试体返回的装箱 Future
pub type BoxedTestFuture = Pin<Box<dyn Future<Output = TestFlow> + Send>>;

/// 钩子返回的装箱 Future
pub type BoxedHookFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;

/// 测试体回调
pub type TestBody = Box<dyn Fn(TestHandle) -> BoxedTestFuture + Send + Sync>;

/// 套件级 before/after 钩子
pub type Hook = Arc<dyn Fn() -> BoxedHookFuture + Send + Sync>;

/// 套件定义体，运行开始时求值恰好一次
pub type SuiteDefinition = Box<dyn FnOnce(&mut TestSuite) -> crate::Result<()> + Send>;

/// 提前结束测试体的控制信号
///
/// 只在单个测试的执行边界被捕获，不会越过测试向外传播
#[derive(Debug, thiserror::Error)]
pub enum Halt {
    /// 测试体显式挂起
    #[error("test marked as pending")]
    Pending,
    /// 测试体冒出的意外错误
    #[error(transparent)]
    Error(#[from] anyhow::Error),
}

/// 测试体的返回类型，`?` 在任意断点短路
pub type TestFlow = Result<(), Halt>;

/// 断言或显式信号发生的源码位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: &'static str,
    pub line: u32,
}

impl SourceLocation {
    #[track_caller]
    pub fn caller() -> Self {
        let location = std::panic::Location::caller();
        Self {
            file: location.file(),
            line: location.line(),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// 非成功结果携带的消息
#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeMessage {
    /// 走消息目录渲染
    Keyed(Message),
    /// 原样展示的自由文本（异常消息、panic 文本）
    Plain(String),
}

/// 非成功结果的负载：消息加可选源码位置
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeDetail {
    pub message: OutcomeMessage,
    pub location: Option<SourceLocation>,
}

impl OutcomeDetail {
    pub fn keyed(message: Message, location: Option<SourceLocation>) -> Self {
        Self {
            message: OutcomeMessage::Keyed(message),
            location,
        }
    }

    pub fn plain(text: impl Into<String>, location: Option<SourceLocation>) -> Self {
        Self {
            message: OutcomeMessage::Plain(text.into()),
            location,
        }
    }
}

/// 单个测试的终态，五种互斥状态
#[derive(Debug, Clone, PartialEq)]
pub enum TestOutcome {
    Success,
    /// 断言不成立或显式失败
    Failure(OutcomeDetail),
    /// 意外异常、panic 或断言无法求值
    Error(OutcomeDetail),
    /// 占位（无测试体）或测试体显式挂起
    Pending {
        reason: Option<String>,
        explicit: bool,
    },
    Skipped,
}

impl TestOutcome {
    pub fn failure(message: Message, location: Option<SourceLocation>) -> Self {
        TestOutcome::Failure(OutcomeDetail::keyed(message, location))
    }

    pub fn failure_text(text: impl Into<String>, location: Option<SourceLocation>) -> Self {
        TestOutcome::Failure(OutcomeDetail::plain(text, location))
    }

    pub fn error(text: impl Into<String>, location: Option<SourceLocation>) -> Self {
        TestOutcome::Error(OutcomeDetail::plain(text, location))
    }

    pub fn error_keyed(message: Message, location: Option<SourceLocation>) -> Self {
        TestOutcome::Error(OutcomeDetail::keyed(message, location))
    }

    pub fn status_name(&self) -> &'static str {
        match self {
            TestOutcome::Success => "success",
            TestOutcome::Failure(_) => "failure",
            TestOutcome::Error(_) => "error",
            TestOutcome::Pending { .. } => "pending",
            TestOutcome::Skipped => "skipped",
        }
    }

    /// 冲突信号的优先级：error > failure > pending > success
    pub(crate) fn priority(&self) -> u8 {
        match self {
            TestOutcome::Error(_) => 3,
            TestOutcome::Failure(_) => 2,
            TestOutcome::Pending { .. } => 1,
            TestOutcome::Success | TestOutcome::Skipped => 0,
        }
    }
}

/// 把 panic 负载转成可读文本
pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
