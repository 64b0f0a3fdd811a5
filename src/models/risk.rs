//! Scored per-file results and the output of one scan pass

use super::config::Thresholds;
use super::metrics::{FileMetrics, Language};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Per-file risk score with its five normalised components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScoreResult {
    pub file_path: PathBuf,
    pub language: Language,
    pub complexity_score: f64,
    pub function_size_score: f64,
    pub churn_score: f64,
    pub depth_score: f64,
    pub param_score: f64,
    pub fan_in: usize,
    pub fan_out: usize,
    pub global_score: f64,

    // Raw inputs behind the component scores
    pub max_complexity: u32,
    pub max_function_size: usize,
    pub max_depth: u32,
    pub max_params: u32,
    pub churn_touches: u32,
}

impl RiskScoreResult {
    pub fn risk_level(&self, thresholds: &Thresholds) -> RiskLevel {
        RiskLevel::classify(self.global_score, thresholds)
    }
}

/// Presentation bucket for a global score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Warning,
    Alert,
}

impl RiskLevel {
    pub fn classify(score: f64, thresholds: &Thresholds) -> Self {
        if score >= thresholds.alert {
            RiskLevel::Alert
        } else if score >= thresholds.warning {
            RiskLevel::Warning
        } else {
            RiskLevel::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Warning => "WARN",
            RiskLevel::Alert => "ALERT",
        }
    }
}

/// Directed import edge between two scanned files
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileEdge {
    pub from: PathBuf,
    pub to: PathBuf,
}

impl FileEdge {
    pub fn new(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// A file excluded from a scan, with the reason
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Complete result of one scan pass; replaces any previous result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub project_root: PathBuf,
    pub scanned_at: DateTime<Utc>,
    #[serde(with = "duration_millis")]
    pub duration: Duration,
    /// Sorted descending by global score, ties by path
    pub files: Vec<RiskScoreResult>,
    pub edges: Vec<FileEdge>,
    /// Strongly connected import groups with more than one file
    pub cycles: Vec<Vec<PathBuf>>,
    pub metrics: Vec<FileMetrics>,
    pub failures: Vec<ScanFailure>,
}

impl ScanResult {
    pub fn file(&self, path: &Path) -> Option<&RiskScoreResult> {
        self.files.iter().find(|f| f.file_path == path)
    }

    /// Count files per risk level: (alerts, warnings)
    pub fn level_counts(&self, thresholds: &Thresholds) -> (usize, usize) {
        self.files.iter().fold((0, 0), |(alerts, warnings), f| {
            match f.risk_level(thresholds) {
                RiskLevel::Alert => (alerts + 1, warnings),
                RiskLevel::Warning => (alerts, warnings + 1),
                RiskLevel::Low => (alerts, warnings),
            }
        })
    }
}

/// Sort results descending by score, breaking ties by path
pub fn sort_results(files: &mut [RiskScoreResult]) {
    files.sort_by(|a, b| {
        b.global_score
            .total_cmp(&a.global_score)
            .then_with(|| a.file_path.cmp(&b.file_path))
    });
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
