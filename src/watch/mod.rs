//! Watch mode: debounced re-scans on filesystem changes

pub mod scheduler;
pub mod watcher;

pub use scheduler::{DebounceScheduler, Poll, SchedulerState};
pub use watcher::{classify, FileChange, ProjectWatcher, WatchFilter, WatchHandle, WatchHandler};
