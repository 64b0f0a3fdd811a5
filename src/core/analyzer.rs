//! Per-file analysis
//!
//! Reads one file, extracts its metrics and scores it against a churn
//! snapshot. The source text is kept for the import graph pass.

use crate::error::{PulseError, Result};
use crate::models::{FileMetrics, Language, RiskScoreResult};
use crate::parsers::MetricExtractor;
use crate::scoring::risk::aggregate;
use crate::scoring::ChurnSnapshot;
use std::fs;
use std::path::Path;

/// Everything the scan keeps about one analysed file
#[derive(Debug, Clone)]
pub struct AnalyzedFile {
    pub metrics: FileMetrics,
    pub risk: RiskScoreResult,
    pub source: String,
}

/// File analyzer shared by all workers of a scan
pub struct Analyzer {
    extractor: MetricExtractor,
}

impl Analyzer {
    pub fn new() -> Self {
        Self {
            extractor: MetricExtractor::new(),
        }
    }

    /// Analyze the file at `path`
    ///
    /// Fails only when the file cannot be read as UTF-8 text; parse failures
    /// degrade inside the extractor.
    pub fn analyze_file(&self, path: &Path, churn: &ChurnSnapshot) -> Result<AnalyzedFile> {
        let source = fs::read_to_string(path).map_err(|e| PulseError::read_error(path, e))?;
        let metrics = self.extractor.extract(path, &source, Language::from_path(path));
        let risk = aggregate(&metrics, churn.score(path), churn.touches(path));

        Ok(AnalyzedFile {
            metrics,
            risk,
            source,
        })
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}
