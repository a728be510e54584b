mod asserter;
mod evaluator;
mod render;
/// 断言模块 - 闭合算子集、求值引擎与链式入口
mod types;

pub use asserter::{Asserter, CodeAsserter};
pub use evaluator::{Verdict, evaluate_assertion};
pub use render::render_value;
pub use types::{
    AssertError, AssertKind, AssertValue, CodeOutcome, CompareOp, ExceptionMatcher, InclusionMode,
    Subject,
};
