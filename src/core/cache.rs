//! Process-scoped churn cache
//!
//! Holds the touch counts of the last history read. The cache is invalidated
//! at the start of every scan and rebuilt lazily on the next query; it is
//! never partially updated.

use crate::scoring::churn::{ChurnSnapshot, HistoryProvider};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Lazily built, explicitly invalidated churn cache
pub struct ChurnCache {
    provider: Box<dyn HistoryProvider>,
    window_days: u32,
    snapshot: Mutex<Option<Arc<ChurnSnapshot>>>,
    builds: AtomicUsize,
}

impl ChurnCache {
    pub fn new(provider: Box<dyn HistoryProvider>, window_days: u32) -> Self {
        Self {
            provider,
            window_days,
            snapshot: Mutex::new(None),
            builds: AtomicUsize::new(0),
        }
    }

    /// Drop the cached counts; the next [`snapshot`](Self::snapshot) re-reads history
    pub fn invalidate(&self) {
        *self.snapshot.lock() = None;
    }

    /// Current counts, reading history first when the cache is empty
    ///
    /// The lock is held while building so concurrent callers share one read.
    pub fn snapshot(&self) -> Arc<ChurnSnapshot> {
        let mut slot = self.snapshot.lock();
        if let Some(snapshot) = slot.as_ref() {
            return Arc::clone(snapshot);
        }

        let snapshot = Arc::new(ChurnSnapshot::from_history(self.provider.as_ref(), self.window_days));
        self.builds.fetch_add(1, Ordering::Relaxed);
        debug!(files = snapshot.len(), "churn cache built");
        *slot = Some(Arc::clone(&snapshot));
        snapshot
    }

    pub fn is_built(&self) -> bool {
        self.snapshot.lock().is_some()
    }

    /// Number of times history has been read
    pub fn build_count(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }
}
