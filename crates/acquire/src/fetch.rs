//! Concurrent fan-out over factor requests.
//!
//! Each request runs on its own `std::thread` and reports back over a
//! `crossbeam_channel`. The collector waits until a shared deadline; a
//! factor that fails, or has not answered by then, is replaced with
//! synthetic data and recorded as degraded. Late workers are not
//! cancelled, their results are dropped.

use crate::error::{AcquireError, Result};
use crate::fallback::synthetic_factor;
use crate::request::FactorRequest;
use crate::source::FactorSource;
use crossbeam_channel::RecvTimeoutError;
use satrisk_core::{FactorData, RiskFactor};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Fan-out settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchOptions {
    /// Deadline for every request, measured from the start of the fan-out
    pub timeout: Duration,
    /// Shape (rows, cols) of synthetic replacement data
    pub fallback_shape: (usize, usize),
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(120),
            fallback_shape: (256, 256),
        }
    }
}

impl FetchOptions {
    pub fn from_config(config: &satrisk_core::AnalysisConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.fetch_timeout_secs),
            fallback_shape: config.fallback_shape,
        }
    }
}

/// A factor that was replaced with synthetic data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DegradedFactor {
    pub factor: RiskFactor,
    pub reason: String,
}

/// Outcome of a fan-out: data for every requested factor, real or synthetic.
#[derive(Debug, Clone, Default)]
pub struct Acquisition {
    pub data: BTreeMap<RiskFactor, FactorData>,
    /// Failed factors in canonical order
    pub degraded: Vec<DegradedFactor>,
}

impl Acquisition {
    pub fn is_degraded(&self, factor: RiskFactor) -> bool {
        self.degraded.iter().any(|d| d.factor == factor)
    }

    pub fn using_fallback(&self) -> bool {
        !self.degraded.is_empty()
    }

    pub fn degraded_factors(&self) -> impl Iterator<Item = RiskFactor> + '_ {
        self.degraded.iter().map(|d| d.factor)
    }
}

/// Fetch every request concurrently.
///
/// Fails with [`AcquireError::AllFailed`] only if every request failed.
pub fn fetch_all(
    source: Arc<dyn FactorSource>,
    requests: Vec<FactorRequest>,
    options: &FetchOptions,
) -> Result<Acquisition> {
    let total = requests.len();
    if total == 0 {
        return Ok(Acquisition::default());
    }

    let (tx, rx) = crossbeam_channel::unbounded();
    let mut pending: BTreeMap<RiskFactor, FactorRequest> = BTreeMap::new();

    tracing::info!(source = source.name(), factors = total, "fetching factor data");

    for request in requests {
        pending.insert(request.factor, request.clone());
        let source = Arc::clone(&source);
        let tx = tx.clone();
        std::thread::spawn(move || {
            let start = Instant::now();
            let outcome = source.fetch(&request);
            tracing::debug!(
                factor = %request.factor,
                ok = outcome.is_ok(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "fetch finished"
            );
            // receiver may be gone after the deadline
            let _ = tx.send((request.factor, outcome));
        });
    }
    drop(tx);

    let deadline = Instant::now() + options.timeout;
    let mut received: BTreeMap<RiskFactor, Result<FactorData>> = BTreeMap::new();

    while received.len() < pending.len() {
        match rx.recv_deadline(deadline) {
            Ok((factor, outcome)) => {
                received.insert(factor, outcome);
            }
            Err(RecvTimeoutError::Timeout) => break,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    let timed_out = Instant::now() >= deadline;
    let mut acquisition = Acquisition::default();

    for (factor, request) in &pending {
        let outcome = received.remove(factor).unwrap_or_else(|| {
            Err(if timed_out {
                AcquireError::Timeout {
                    factor: *factor,
                    secs: options.timeout.as_secs(),
                }
            } else {
                AcquireError::WorkerLost(*factor)
            })
        });

        match outcome {
            Ok(data) => {
                acquisition.data.insert(*factor, data);
            }
            Err(err) => {
                tracing::warn!(factor = %factor, error = %err, "fetch failed, using synthetic data");
                let data = synthetic_factor(Some(&request.bounds), options.fallback_shape)?;
                acquisition.data.insert(*factor, data);
                acquisition.degraded.push(DegradedFactor {
                    factor: *factor,
                    reason: err.to_string(),
                });
            }
        }
    }

    if acquisition.degraded.len() == pending.len() {
        return Err(AcquireError::AllFailed(total));
    }

    Ok(acquisition)
}
