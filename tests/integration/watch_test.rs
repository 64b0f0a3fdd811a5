//! Debounce timing and the live watcher

use super::support::*;
use crossbeam_channel::{unbounded, Receiver, Sender};
use pulse::watch::{DebounceScheduler, Poll, ProjectWatcher, SchedulerState, WatchHandler};
use pulse::{PulseError, ScanResult, Scanner};
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::tempdir;

#[test]
fn test_event_burst_triggers_exactly_one_scan() {
    let delay = Duration::from_millis(1500);
    let t0 = Instant::now();
    let mut scheduler = DebounceScheduler::new(delay);

    let events = [t0, t0 + Duration::from_millis(300), t0 + Duration::from_millis(700)];
    let mut fires = Vec::new();

    // Step a simulated clock in 50ms ticks, delivering events on time
    let mut now = t0;
    let end = t0 + Duration::from_secs(6);
    while now <= end {
        for at in events.iter().filter(|at| **at == now) {
            scheduler.on_event(*at);
        }
        if scheduler.poll(now, true) == Poll::Fire {
            fires.push(now);
            scheduler.finish_scan(now);
        }
        now += Duration::from_millis(50);
    }

    assert_eq!(fires, vec![events[2] + delay]);
    assert_eq!(scheduler.state(), SchedulerState::Idle);
}

#[derive(Debug)]
enum Seen {
    Changed,
    Started,
    Complete(usize),
    Failed,
}

struct ChannelHandler(Sender<Seen>);

impl WatchHandler for ChannelHandler {
    fn on_added(&mut self, _path: &Path) {
        let _ = self.0.send(Seen::Changed);
    }

    fn on_changed(&mut self, _path: &Path) {
        let _ = self.0.send(Seen::Changed);
    }

    fn on_scan_started(&mut self) {
        let _ = self.0.send(Seen::Started);
    }

    fn on_scan_complete(&mut self, result: &ScanResult) {
        let _ = self.0.send(Seen::Complete(result.files.len()));
    }

    fn on_scan_failed(&mut self, _error: &PulseError) {
        let _ = self.0.send(Seen::Failed);
    }
}

fn next_scan(rx: &Receiver<Seen>, timeout: Duration) -> Option<usize> {
    let deadline = Instant::now() + timeout;
    while let Ok(seen) = rx.recv_deadline(deadline) {
        match seen {
            Seen::Complete(files) => return Some(files),
            Seen::Failed => panic!("scan failed"),
            Seen::Changed | Seen::Started => {}
        }
    }
    None
}

fn watched(root: &Path) -> (pulse::WatchHandle, Receiver<Seen>) {
    watched_with_delay(root, 100)
}

fn watched_with_delay(root: &Path, debounce_ms: u64) -> (pulse::WatchHandle, Receiver<Seen>) {
    let mut settings = settings_for(root);
    settings.debounce_ms = debounce_ms;
    let scanner = Scanner::with_history(settings, Box::new(NoHistory)).unwrap();
    let (tx, rx) = unbounded();
    let handle = ProjectWatcher::spawn(scanner, ChannelHandler(tx)).unwrap();
    (handle, rx)
}

#[test]
fn test_watcher_rescans_after_change() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.ts", "export const a = 1;\n");
    let (handle, rx) = watched(dir.path());

    write(dir.path(), "b.ts", "export const b = 2;\n");
    assert_eq!(next_scan(&rx, Duration::from_secs(10)), Some(2));

    handle.stop();
}

#[test]
fn test_burst_of_writes_scans_once() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.ts", "export const a = 1;\n");
    let (handle, rx) = watched_with_delay(dir.path(), 400);

    for version in 2..5 {
        write(dir.path(), "a.ts", &format!("export const a = {};\n", version));
        std::thread::sleep(Duration::from_millis(40));
    }

    assert_eq!(next_scan(&rx, Duration::from_secs(10)), Some(1));
    assert_eq!(next_scan(&rx, Duration::from_millis(1200)), None);

    handle.stop();
}

#[test]
fn test_ignored_paths_do_not_trigger_scans() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.ts", "export const a = 1;\n");
    write(dir.path(), "node_modules/.keep", "");
    let (handle, rx) = watched(dir.path());

    write(dir.path(), "node_modules/dep.js", "module.exports = 1;\n");
    write(dir.path(), "notes.md", "# notes\n");
    assert_eq!(next_scan(&rx, Duration::from_millis(800)), None);

    handle.stop();
}

#[test]
fn test_paused_watcher_drops_events() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.ts", "export const a = 1;\n");
    let (handle, rx) = watched(dir.path());

    handle.pause();
    assert!(handle.is_paused());
    write(dir.path(), "b.ts", "export const b = 2;\n");
    assert_eq!(next_scan(&rx, Duration::from_millis(800)), None);

    handle.resume();
    assert!(!handle.is_paused());
    write(dir.path(), "c.ts", "export const c = 3;\n");
    assert_eq!(next_scan(&rx, Duration::from_secs(10)), Some(3));

    handle.stop();
}

#[test]
fn test_spawn_on_missing_root_fails() {
    let dir = tempdir().unwrap();
    let settings = settings_for(&dir.path().join("absent"));
    let scanner = Scanner::with_history(settings, Box::new(NoHistory)).unwrap();
    let (tx, _rx) = unbounded();
    let err = ProjectWatcher::spawn(scanner, ChannelHandler(tx)).err().unwrap();
    assert!(matches!(err, PulseError::InvalidPath { .. }));
}
