//! Shared fixtures for the integration suite

use pulse::error::Result;
use pulse::scoring::{CommitTouches, HistoryProvider};
use pulse::{PulseError, Scanner, Settings};
use std::fs;
use std::path::{Path, PathBuf};

/// History provider with no commits
pub struct NoHistory;

impl HistoryProvider for NoHistory {
    fn log_since(&self, _window_days: u32) -> Result<Vec<CommitTouches>> {
        Ok(Vec::new())
    }
}

/// History provider whose backend is unavailable
pub struct FailingHistory;

impl HistoryProvider for FailingHistory {
    fn log_since(&self, _window_days: u32) -> Result<Vec<CommitTouches>> {
        Err(PulseError::history_error("git executable not found"))
    }
}

/// History provider replaying a fixed log
pub struct FixedHistory(pub Vec<CommitTouches>);

impl HistoryProvider for FixedHistory {
    fn log_since(&self, _window_days: u32) -> Result<Vec<CommitTouches>> {
        Ok(self.0.clone())
    }
}

/// Write `content` to `root/relative`, creating parent directories
pub fn write(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

pub fn settings_for(root: &Path) -> Settings {
    Settings {
        project_root: root.to_path_buf(),
        show_progress: false,
        ..Settings::default()
    }
}

pub fn scanner_with(root: &Path, history: impl HistoryProvider + 'static) -> Scanner {
    Scanner::with_history(settings_for(root), Box::new(history)).unwrap()
}

pub fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap()
}
