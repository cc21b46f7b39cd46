//! Processing modes for independent units of work (trend periods)

use rayon::prelude::*;

/// How independent work items are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingMode {
    /// One item after the other on the calling thread
    Sequential,
    /// Rayon's global pool
    #[default]
    Parallel,
    /// A dedicated pool with the given number of threads
    ParallelWith(usize),
}

impl ProcessingMode {
    /// `Sequential` for 1 thread, `ParallelWith(n)` otherwise, `Parallel` for 0.
    pub fn from_threads(threads: usize) -> Self {
        match threads {
            0 => Self::Parallel,
            1 => Self::Sequential,
            n => Self::ParallelWith(n),
        }
    }

    /// Map `f` over `items`, preserving order.
    pub fn map<T, U, F>(&self, items: &[T], f: F) -> Vec<U>
    where
        T: Sync,
        U: Send,
        F: Fn(&T) -> U + Sync + Send,
    {
        match self {
            ProcessingMode::Sequential => items.iter().map(f).collect(),
            ProcessingMode::Parallel => items.par_iter().map(f).collect(),
            ProcessingMode::ParallelWith(threads) => {
                match rayon::ThreadPoolBuilder::new().num_threads(*threads).build() {
                    Ok(pool) => pool.install(|| items.par_iter().map(&f).collect()),
                    Err(e) => {
                        tracing::warn!(error = %e, "thread pool unavailable, running sequentially");
                        items.iter().map(f).collect()
                    }
                }
            }
        }
    }
}
