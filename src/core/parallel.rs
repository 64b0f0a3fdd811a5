//! Parallel processing utilities

use crate::error::PulseError;
use crate::error::Result;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Progress update information for parallel operations
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    pub current: usize,
    pub total: usize,
    pub message: String,
}

impl ProgressUpdate {
    /// Create a new progress update
    pub fn new(current: usize, total: usize, message: impl Into<String>) -> Self {
        Self {
            current,
            total,
            message: message.into(),
        }
    }

    /// Calculate progress percentage
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.current as f64 / self.total as f64) * 100.0
        }
    }
}

/// Runs per-item work either on a dedicated rayon pool or inline
pub struct WorkerPool {
    pool: Option<ThreadPool>,
}

impl WorkerPool {
    /// A pool with one worker per logical CPU, or a sequential runner
    pub fn new(parallel: bool) -> Result<Self> {
        if !parallel {
            return Ok(Self::sequential());
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(num_cpus::get())
            .thread_name(|i| format!("pulse-worker-{}", i))
            .build()
            .map_err(|e| PulseError::ParallelExecution {
                message: e.to_string(),
                #[cfg(not(tarpaulin_include))]
                backtrace: std::backtrace::Backtrace::capture(),
            })?;
        Ok(Self { pool: Some(pool) })
    }

    pub fn sequential() -> Self {
        Self { pool: None }
    }

    pub fn is_parallel(&self) -> bool {
        self.pool.is_some()
    }

    /// Map `f` over `items`, preserving order, reporting each completion
    pub fn map_with_progress<T, R, F, P>(&self, items: &[T], f: F, progress: P) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Send + Sync,
        P: Fn(ProgressUpdate) + Send + Sync,
    {
        let total = items.len();
        let counter = AtomicUsize::new(0);
        let run = |item: &T| {
            let result = f(item);
            let done = counter.fetch_add(1, Ordering::Relaxed) + 1;
            progress(ProgressUpdate::new(
                done,
                total,
                format!("Analysing file {}/{}", done, total),
            ));
            result
        };

        match &self.pool {
            Some(pool) => pool.install(|| items.par_iter().map(run).collect::<Vec<R>>()),
            None => items.iter().map(run).collect::<Vec<R>>(),
        }
    }
}
