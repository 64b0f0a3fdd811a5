//! Source file discovery
//!
//! Recursive traversal with ignore-list pruning, a visited set of canonical
//! directories to survive symlink loops, and per-entry error recovery.

use crate::error::{PulseError, Result};
use crate::models::{Language, ScanFailure};
use glob::Pattern;
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name fragments that mark generated or test files
pub const IGNORED_FILE_MARKERS: &[&str] = &[
    ".min.js",
    ".min.ts",
    ".d.ts",
    ".map",
    ".spec.",
    ".test.",
    "__tests__",
];

/// Basename patterns pruned from discovery and watching
#[derive(Debug, Clone)]
pub struct IgnoreList {
    patterns: Vec<Pattern>,
}

impl IgnoreList {
    /// Compile the configured entries; each is an exact name or a glob
    pub fn new(entries: &[String]) -> Result<Self> {
        let patterns = entries
            .iter()
            .map(|entry| Pattern::new(entry))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.as_str() == name || p.matches(name))
    }

    /// Whether any component of `path` is ignored
    pub fn has_ignored_component(&self, path: &Path) -> bool {
        path.components()
            .any(|c| self.matches_name(&c.as_os_str().to_string_lossy()))
    }
}

/// Whether `path` names a file Pulse analyses
pub fn is_source_file(path: &Path) -> bool {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
        return false;
    };
    Language::is_supported_path(path) && !IGNORED_FILE_MARKERS.iter().any(|m| name.contains(m))
}

/// Files found under a root plus the entries that could not be read
#[derive(Debug, Default)]
pub struct Discovery {
    /// Canonical, deduplicated, sorted
    pub files: Vec<PathBuf>,
    pub failures: Vec<ScanFailure>,
}

/// Recursive walker over a project tree
pub struct SourceWalker {
    ignore: IgnoreList,
}

impl SourceWalker {
    pub fn new(ignore: IgnoreList) -> Self {
        Self { ignore }
    }

    pub fn from_settings(ignore: &[String]) -> Result<Self> {
        Ok(Self::new(IgnoreList::new(ignore)?))
    }

    pub fn discover(&self, root: &Path) -> Discovery {
        let mut visited = HashSet::new();
        let mut files = BTreeSet::new();
        let mut failures = Vec::new();

        self.walk_dir(root, &mut visited, &mut files, &mut failures);

        debug!(
            root = %root.display(),
            files = files.len(),
            directories = visited.len(),
            "discovery complete"
        );
        Discovery {
            files: files.into_iter().collect(),
            failures,
        }
    }

    fn walk_dir(
        &self,
        dir: &Path,
        visited: &mut HashSet<PathBuf>,
        files: &mut BTreeSet<PathBuf>,
        failures: &mut Vec<ScanFailure>,
    ) {
        let canonical = match fs::canonicalize(dir) {
            Ok(path) => path,
            Err(err) => {
                record(failures, PulseError::directory_traversal_error(dir, err.to_string()));
                return;
            }
        };
        if !visited.insert(canonical.clone()) {
            return;
        }

        let entries = match fs::read_dir(&canonical) {
            Ok(entries) => entries,
            Err(err) => {
                record(failures, PulseError::read_error(&canonical, err));
                return;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    record(failures, PulseError::read_error(&canonical, err));
                    continue;
                }
            };

            let name = entry.file_name();
            if self.ignore.matches_name(&name.to_string_lossy()) {
                continue;
            }

            let path = entry.path();
            // Follows symlinks; a dangling link fails here
            let metadata = match fs::metadata(&path) {
                Ok(metadata) => metadata,
                Err(err) => {
                    record(failures, PulseError::read_error(&path, err));
                    continue;
                }
            };

            if metadata.is_dir() {
                self.walk_dir(&path, visited, files, failures);
            } else if metadata.is_file() && is_source_file(&path) {
                match fs::canonicalize(&path) {
                    Ok(file) => {
                        files.insert(file);
                    }
                    Err(err) => record(failures, PulseError::read_error(&path, err)),
                }
            }
        }
    }
}

fn record(failures: &mut Vec<ScanFailure>, err: PulseError) {
    let path = match &err {
        PulseError::IoRead { path, .. }
        | PulseError::PermissionDenied { path, .. }
        | PulseError::DirectoryTraversal { path, .. } => path.clone(),
        _ => PathBuf::new(),
    };
    warn!(path = %path.display(), reason = %err, "skipping unreadable entry");
    failures.push(ScanFailure {
        path,
        reason: err.to_string(),
    });
}
