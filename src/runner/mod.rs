pub mod context;
pub mod executor;
pub mod reporter;
pub mod types;

pub use context::{RunContext, TestFilter};
pub use executor::TestRunner;
pub use reporter::{ConsoleReporter, Reporter};
pub use types::{FailureRecord, RunSummary, SuiteSummary};
