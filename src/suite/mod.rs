pub mod suite;
pub mod types;

pub use suite::TestSuite;
pub use test::{Test, TestHandle};
pub use types::{Halt, OutcomeDetail, OutcomeMessage, SourceLocation, TestFlow, TestOutcome};
