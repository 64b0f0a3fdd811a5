//! Filesystem watching and serialized re-scans
//!
//! One thread owns the [`Scanner`] and the [`DebounceScheduler`]. Filesystem
//! events, resume nudges and the stop request all arrive on the same channel,
//! so scans never overlap and no lock guards the scheduler.

use super::scheduler::{DebounceScheduler, Poll};
use crate::core::{is_source_file, IgnoreList, Scanner};
use crate::error::{PulseError, Result};
use crate::models::ScanResult;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::{debug, info, trace, warn};

/// Kind of change reported for a single path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileChange {
    Added,
    Changed,
    Deleted,
}

/// Callbacks from the watch thread; every method defaults to a no-op
pub trait WatchHandler: Send + 'static {
    fn on_added(&mut self, _path: &Path) {}
    fn on_changed(&mut self, _path: &Path) {}
    fn on_deleted(&mut self, _path: &Path) {}
    fn on_scan_started(&mut self) {}
    fn on_scan_complete(&mut self, _result: &ScanResult) {}
    fn on_scan_failed(&mut self, _error: &PulseError) {}
}

enum Message {
    Fs(notify::Result<Event>),
    Nudge,
    Stop,
}

/// Decides which filesystem events may schedule a scan
#[derive(Debug, Clone)]
pub struct WatchFilter {
    root: PathBuf,
    ignore: IgnoreList,
}

impl WatchFilter {
    pub fn new(root: impl Into<PathBuf>, ignore: IgnoreList) -> Self {
        Self {
            root: root.into(),
            ignore,
        }
    }

    /// Additions and changes must name a source file; deletions only need to
    /// lie outside the ignore list
    pub fn accepts(&self, change: FileChange, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        if self.ignore.has_ignored_component(relative) {
            return false;
        }
        match change {
            FileChange::Deleted => true,
            FileChange::Added | FileChange::Changed => is_source_file(path),
        }
    }
}

/// Map a raw notify event to per-path changes
pub fn classify(event: &Event) -> Vec<(FileChange, PathBuf)> {
    let change = match &event.kind {
        EventKind::Create(_) => Some(FileChange::Added),
        EventKind::Remove(_) => Some(FileChange::Deleted),
        // A rename reports each side; whichever still exists was added
        EventKind::Modify(ModifyKind::Name(_)) => None,
        EventKind::Modify(_) => Some(FileChange::Changed),
        EventKind::Access(_) | EventKind::Any | EventKind::Other => return Vec::new(),
    };
    event
        .paths
        .iter()
        .map(|path| {
            let change = change.unwrap_or_else(|| {
                if path.exists() {
                    FileChange::Added
                } else {
                    FileChange::Deleted
                }
            });
            (change, path.clone())
        })
        .collect()
}

/// Control surface for a running watch
pub struct WatchHandle {
    paused: Arc<AtomicBool>,
    tx: Sender<Message>,
    thread: Option<JoinHandle<()>>,
}

impl WatchHandle {
    /// Stop observing events; a due scan waits until [`resume`](Self::resume)
    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
        debug!("watch paused");
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
        let _ = self.tx.send(Message::Nudge);
        debug!("watch resumed");
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Stop the watch thread and wait for an in-flight scan to finish
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let _ = self.tx.send(Message::Stop);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("watch thread panicked");
            }
        }
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Watches a project tree and re-scans it after each burst of changes
pub struct ProjectWatcher;

impl ProjectWatcher {
    /// Start watching the scanner's project root on a dedicated thread
    ///
    /// No scan runs until the first relevant event; callers wanting an
    /// initial report scan before spawning.
    pub fn spawn<H: WatchHandler>(scanner: Scanner, handler: H) -> Result<WatchHandle> {
        let settings = scanner.settings();
        let root = fs::canonicalize(&settings.project_root)
            .map_err(|_| PulseError::invalid_path(&settings.project_root))?;
        let filter = WatchFilter::new(&root, IgnoreList::new(&settings.ignore)?);
        let scheduler = DebounceScheduler::from_millis(settings.debounce_ms);

        let (tx, rx) = unbounded();
        let events = tx.clone();
        let mut watcher = notify::recommended_watcher(move |event: notify::Result<Event>| {
            let _ = events.send(Message::Fs(event));
        })?;
        watcher.watch(&root, RecursiveMode::Recursive)?;
        info!(root = %root.display(), debounce_ms = settings.debounce_ms, "watching for changes");

        let paused = Arc::new(AtomicBool::new(false));
        let event_loop = EventLoop {
            scanner,
            handler,
            scheduler,
            filter,
            paused: Arc::clone(&paused),
            rx,
            _watcher: watcher,
        };
        let thread = thread::Builder::new()
            .name("pulse-watch".to_string())
            .spawn(move || event_loop.run())?;

        Ok(WatchHandle {
            paused,
            tx,
            thread: Some(thread),
        })
    }
}

struct EventLoop<H> {
    scanner: Scanner,
    handler: H,
    scheduler: DebounceScheduler,
    filter: WatchFilter,
    paused: Arc<AtomicBool>,
    rx: Receiver<Message>,
    // Dropping the watcher ends event delivery
    _watcher: RecommendedWatcher,
}

impl<H: WatchHandler> EventLoop<H> {
    fn run(mut self) {
        loop {
            let allowed = !self.paused.load(Ordering::SeqCst);
            let message = match self.scheduler.poll(Instant::now(), allowed) {
                Poll::Fire => {
                    self.run_scan();
                    self.scheduler.finish_scan(Instant::now());
                    continue;
                }
                Poll::WaitUntil(deadline) => match self.rx.recv_deadline(deadline) {
                    Ok(message) => message,
                    Err(RecvTimeoutError::Timeout) => continue,
                    Err(RecvTimeoutError::Disconnected) => break,
                },
                Poll::WaitForEvent => match self.rx.recv() {
                    Ok(message) => message,
                    Err(_) => break,
                },
            };

            match message {
                Message::Stop => break,
                Message::Nudge => {}
                Message::Fs(Ok(event)) => self.observe(&event),
                Message::Fs(Err(err)) => warn!(reason = %err, "watch error"),
            }
        }
        debug!("watch loop stopped");
    }

    fn observe(&mut self, event: &Event) {
        if self.paused.load(Ordering::SeqCst) {
            trace!(kind = ?event.kind, "event dropped while paused");
            return;
        }
        for (change, path) in classify(event) {
            if !self.filter.accepts(change, &path) {
                continue;
            }
            trace!(path = %path.display(), ?change, "relevant change");
            match change {
                FileChange::Added => self.handler.on_added(&path),
                FileChange::Changed => self.handler.on_changed(&path),
                FileChange::Deleted => self.handler.on_deleted(&path),
            }
            self.scheduler.on_event(Instant::now());
        }
    }

    fn run_scan(&mut self) {
        self.handler.on_scan_started();
        match self.scanner.scan() {
            Ok(result) => self.handler.on_scan_complete(&result),
            Err(err) => {
                warn!(reason = %err, "re-scan failed");
                self.handler.on_scan_failed(&err);
            }
        }
    }
}
