pub mod assertion;
pub mod cli;
pub mod config;
pub mod error;
pub mod i18n;
pub mod logger;
pub mod runner;
pub mod suite;

// Re-export commonly used types
pub use error::{Result, RutestError};
