//! Bounded worker pool for the measurement phases.

use rayon::prelude::*;
use tracing::debug;

use crate::error::SchedError;

/// A pool of worker threads running independent one-shot measurements.
///
/// Each task works on its own target or test group and returns a value; the
/// results are only visible to the caller once every task has finished.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    threads: usize,
}

impl WorkerPool {
    /// Creates a pool with `threads` workers; 0 uses every available CPU.
    pub fn new(threads: usize) -> Self {
        Self { threads }
    }

    /// A pool that runs tasks one after another.
    pub fn serial() -> Self {
        Self { threads: 1 }
    }

    /// Applies `task` to every item in parallel.
    ///
    /// Results are returned in item order. A failing task does not cancel
    /// the others.
    pub fn map<I, T, F>(&self, items: &[I], task: F) -> Result<Vec<Result<T, SchedError>>, SchedError>
    where
        I: Sync,
        T: Send,
        F: Fn(&I) -> Result<T, SchedError> + Sync,
    {
        if items.is_empty() {
            return Ok(Vec::new());
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
            .map_err(|e| SchedError::Pool(e.to_string()))?;
        debug!(
            tasks = items.len(),
            workers = pool.current_num_threads(),
            "dispatching"
        );
        Ok(pool.install(|| items.par_iter().map(&task).collect()))
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(0)
    }
}
