//! Error types for factor acquisition.

use satrisk_core::RiskFactor;
use thiserror::Error;

/// Errors produced while acquiring factor data.
#[derive(Error, Debug)]
pub enum AcquireError {
    #[error("{factor}: data provider unavailable: {reason}")]
    Unavailable { factor: RiskFactor, reason: String },

    #[error("{0}: no data returned")]
    NoData(RiskFactor),

    #[error("{factor}: no response within {secs}s")]
    Timeout { factor: RiskFactor, secs: u64 },

    #[error("{0}: worker exited without reporting")]
    WorkerLost(RiskFactor),

    #[error("invalid date range: {start} is after {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("all {0} factor requests failed")]
    AllFailed(usize),

    #[error("core error: {0}")]
    Core(#[from] satrisk_core::Error),
}

/// Result alias for acquisition operations.
pub type Result<T> = std::result::Result<T, AcquireError>;
