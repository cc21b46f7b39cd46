//! # SatRisk Acquire
//!
//! Obtaining raw factor data.
//!
//! A [`FactorSource`] turns one [`FactorRequest`] into a factor stack.
//! [`fetch_all`] runs every request concurrently under a shared deadline and
//! substitutes [synthetic data](fallback) for factors that fail, so the rest
//! of the pipeline always sees a complete set unless every factor failed.

pub mod error;
pub mod fallback;
mod fetch;
mod request;
mod source;

pub use error::{AcquireError, Result};
pub use fetch::{fetch_all, Acquisition, DegradedFactor, FetchOptions};
pub use request::{DateRange, FactorRequest};
pub use source::{FactorSource, TiffDirectorySource};
