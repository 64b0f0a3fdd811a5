//! Change-frequency (churn) scoring from version history

use super::risk::CHURN;
use crate::error::{OptionExt, PulseError, Result};
use chrono::{TimeDelta, TimeZone, Utc};
use git2::{Repository, Sort};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Paths touched by one commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitTouches {
    pub commit: String,
    /// Absolute paths
    pub paths: Vec<PathBuf>,
}

/// Source of per-commit touched paths within a trailing window
pub trait HistoryProvider: Send + Sync {
    fn log_since(&self, window_days: u32) -> Result<Vec<CommitTouches>>;
}

/// [`HistoryProvider`] backed by the git repository containing a directory
pub struct GitHistory {
    root: PathBuf,
}

impl GitHistory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl HistoryProvider for GitHistory {
    /// Walk from `HEAD` newest-first until a commit falls outside the window
    ///
    /// Merge commits are skipped; every other commit is diffed against its
    /// first parent, or the empty tree for a root commit.
    fn log_since(&self, window_days: u32) -> Result<Vec<CommitTouches>> {
        let repo = Repository::discover(&self.root)?;
        let workdir = repo
            .workdir()
            .ok_or_error(|| PulseError::history_error("repository has no working directory"))?;
        let workdir = fs::canonicalize(workdir).unwrap_or_else(|_| workdir.to_path_buf());
        debug!(repo = %workdir.display(), window_days, "reading churn history");

        let cutoff = TimeDelta::try_days(i64::from(window_days))
            .and_then(|window| Utc::now().checked_sub_signed(window))
            .ok_or_error(|| {
                PulseError::history_error(format!(
                    "churn window of {} days is out of range",
                    window_days
                ))
            })?;

        let mut revwalk = repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME)?;
        revwalk.push_head()?;

        let mut log = Vec::new();
        for oid in revwalk {
            let commit = repo.find_commit(oid?)?;

            let committed = Utc.timestamp_opt(commit.time().seconds(), 0).single();
            if committed.is_some_and(|at| at < cutoff) {
                break;
            }
            if commit.parent_count() > 1 {
                continue;
            }

            let tree = commit.tree()?;
            let parent_tree = match commit.parent(0) {
                Ok(parent) => Some(parent.tree()?),
                Err(_) => None,
            };
            let diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;

            let paths = diff
                .deltas()
                .filter_map(|delta| delta.new_file().path().or_else(|| delta.old_file().path()))
                .map(|relative| workdir.join(relative))
                .collect();

            log.push(CommitTouches {
                commit: commit.id().to_string(),
                paths,
            });
        }

        Ok(log)
    }
}

/// Touch counts per file for one scan
///
/// Taken once before per-file analysis and shared read-only by the workers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChurnSnapshot {
    touches: HashMap<PathBuf, u32>,
}

impl ChurnSnapshot {
    /// Tally touches from `provider`; a failing provider yields an empty snapshot
    pub fn from_history(provider: &dyn HistoryProvider, window_days: u32) -> Self {
        match provider.log_since(window_days) {
            Ok(log) => Self::from_log(log),
            Err(err) => {
                warn!(reason = %err, "history unavailable, churn treated as zero");
                Self::default()
            }
        }
    }

    pub fn from_log(log: impl IntoIterator<Item = CommitTouches>) -> Self {
        let mut touches = HashMap::new();
        for commit in log {
            for path in commit.paths {
                *touches.entry(path).or_insert(0) += 1;
            }
        }
        Self { touches }
    }

    /// Raw number of commits touching `path` in the window
    pub fn touches(&self, path: &Path) -> u32 {
        self.touches.get(path).copied().unwrap_or(0)
    }

    /// Normalised churn score in [0, 100]
    pub fn score(&self, path: &Path) -> f64 {
        CHURN.score(self.touches(path) as f64)
    }

    pub fn is_empty(&self) -> bool {
        self.touches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.touches.len()
    }
}
