//! Error types for analysis runs.

use thiserror::Error;

/// Errors that abort an analysis request.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("unable to fetch any satellite data for {0}")]
    NoUsableData(String),

    #[error("invalid date range: start {start} must be before end {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("no data could be retrieved for any of the {0} time periods")]
    NoPeriodData(usize),

    #[error(transparent)]
    Core(#[from] satrisk_core::Error),

    #[error(transparent)]
    Acquire(#[from] satrisk_acquire::AcquireError),
}

/// Result alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
