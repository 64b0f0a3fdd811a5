//! Scan orchestration
//!
//! One scan is a full re-walk of the project: discover files, read churn once,
//! analyse every file, then build the import graph and backfill fan-in/out.
//! Only an unusable project root aborts a scan; everything file-scoped is
//! recorded as a failure and skipped.

use crate::core::analyzer::{AnalyzedFile, Analyzer};
use crate::core::cache::ChurnCache;
use crate::core::parallel::{ProgressUpdate, WorkerPool};
use crate::core::walker::SourceWalker;
use crate::error::{PulseError, Result};
use crate::models::risk::sort_results;
use crate::models::{ScanFailure, ScanResult, Settings};
use crate::parsers::DependencyGraphBuilder;
use crate::scoring::churn::{GitHistory, HistoryProvider};
use chrono::Utc;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Runs scans of one project
pub struct Scanner {
    settings: Settings,
    walker: SourceWalker,
    analyzer: Analyzer,
    churn: ChurnCache,
    workers: WorkerPool,
}

impl Scanner {
    /// Scanner reading churn from the git repository around the project root
    pub fn new(settings: Settings) -> Result<Self> {
        let history = GitHistory::new(settings.project_root.clone());
        Self::with_history(settings, Box::new(history))
    }

    pub fn with_history(settings: Settings, history: Box<dyn HistoryProvider>) -> Result<Self> {
        let walker = SourceWalker::from_settings(&settings.ignore)?;
        let workers = WorkerPool::new(settings.parallel)?;
        let churn = ChurnCache::new(history, settings.churn_window_days);
        Ok(Self {
            settings,
            walker,
            analyzer: Analyzer::new(),
            churn,
            workers,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn churn_cache(&self) -> &ChurnCache {
        &self.churn
    }

    pub fn scan(&self) -> Result<ScanResult> {
        self.scan_with_progress(|_| {})
    }

    pub fn scan_with_progress<P>(&self, progress: P) -> Result<ScanResult>
    where
        P: Fn(ProgressUpdate) + Send + Sync,
    {
        let started = Instant::now();
        let root = self.project_root()?;
        debug!(root = %root.display(), "scan started");

        self.churn.invalidate();
        let discovery = self.walker.discover(&root);
        let churn = self.churn.snapshot();

        let analyzer = &self.analyzer;
        let outcomes = self.workers.map_with_progress(
            &discovery.files,
            |path| analyzer.analyze_file(path, &churn),
            progress,
        );

        let mut failures = discovery.failures;
        let mut analyzed: Vec<AnalyzedFile> = Vec::with_capacity(outcomes.len());
        for (path, outcome) in discovery.files.iter().zip(outcomes) {
            match outcome {
                Ok(file) => analyzed.push(file),
                Err(err) => {
                    warn!(path = %path.display(), reason = %err, "skipping file");
                    failures.push(ScanFailure {
                        path: path.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        let files: Vec<PathBuf> = analyzed.iter().map(|a| a.metrics.file_path.clone()).collect();
        let mut sources = HashMap::with_capacity(analyzed.len());
        let mut metrics = Vec::with_capacity(analyzed.len());
        let mut results = Vec::with_capacity(analyzed.len());
        for file in analyzed {
            sources.insert(file.metrics.file_path.clone(), file.source);
            metrics.push(file.metrics);
            results.push(file.risk);
        }

        let graph = DependencyGraphBuilder::new(&files, &sources).build();
        for result in &mut results {
            result.fan_in = graph.fan_in(&result.file_path);
            result.fan_out = graph.fan_out(&result.file_path);
        }
        sort_results(&mut results);

        let scan = ScanResult {
            project_root: root,
            scanned_at: Utc::now(),
            duration: started.elapsed(),
            files: results,
            edges: graph.edges(),
            cycles: graph.cycles(),
            metrics,
            failures,
        };

        info!(
            files = scan.files.len(),
            edges = scan.edges.len(),
            failures = scan.failures.len(),
            elapsed_ms = scan.duration.as_millis() as u64,
            "scan complete"
        );
        Ok(scan)
    }

    /// Canonical, readable project root
    fn project_root(&self) -> Result<PathBuf> {
        let configured = &self.settings.project_root;
        let root = fs::canonicalize(configured).map_err(|_| PulseError::invalid_path(configured))?;
        if !root.is_dir() || fs::read_dir(&root).is_err() {
            return Err(PulseError::invalid_path(configured));
        }
        Ok(root)
    }
}

/// Scan `project_root` once with default settings
pub fn scan(project_root: &Path) -> Result<ScanResult> {
    let settings = Settings {
        project_root: project_root.to_path_buf(),
        ..Settings::default()
    };
    Scanner::new(settings)?.scan()
}
