pub mod analytics;
pub mod config;
pub mod error;
pub mod journal;
pub mod report;
pub mod types;

#[cfg(feature = "insights")]
pub mod insights;

#[cfg(feature = "scoring")]
pub mod scoring;

pub use config::{AnalysisConfig, MinSamples};
pub use error::JournalError;
pub use types::*;

/// Standard result type for all journal operations
pub type JournalResult<T> = Result<T, JournalError>;
