//! Configuration-related data structures

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Directory and file basenames skipped by default during discovery and watching
pub const DEFAULT_IGNORE: &[&str] = &[
    "node_modules",
    ".git",
    "dist",
    "build",
    ".vite",
    "vendor",
    "__pycache__",
];

/// Longest accepted churn window, in days
pub const MAX_CHURN_WINDOW_DAYS: u32 = 36_500;

/// Main configuration settings for Pulse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Root directory of the project to analyse
    pub project_root: PathBuf,

    /// Basenames or glob patterns pruned from discovery and watching
    pub ignore: Vec<String>,

    /// Score thresholds used to classify files in reports
    pub thresholds: Thresholds,

    /// Quiet period after the last filesystem event before a re-scan
    pub debounce_ms: u64,

    /// Trailing history window for churn, in days
    pub churn_window_days: u32,

    /// Whether to analyse files on a worker pool
    pub parallel: bool,

    /// Output format (text, json, csv)
    pub output_format: OutputFormat,

    /// Output file path (if not specified, output to stdout)
    pub output_file: Option<PathBuf>,

    /// Whether to use colors in text output
    pub use_colors: bool,

    /// Whether to show progress bars
    pub show_progress: bool,

    /// Whether to suppress non-essential output
    pub quiet: bool,

    /// Whether to show detailed progress and debug information
    pub verbose: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            ignore: DEFAULT_IGNORE.iter().map(|s| s.to_string()).collect(),
            thresholds: Thresholds::default(),
            debounce_ms: 1500,
            churn_window_days: 30,
            parallel: true,
            output_format: OutputFormat::Text,
            output_file: None,
            use_colors: true,
            show_progress: true,
            quiet: false,
            verbose: false,
        }
    }
}

/// Presentation thresholds on the global score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Scores at or above this are alerts
    pub alert: f64,
    /// Scores at or above this (and below `alert`) are warnings
    pub warning: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            alert: 50.0,
            warning: 20.0,
        }
    }
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for programmatic consumption
    Json,
    /// CSV output for spreadsheet analysis
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Partial settings for configuration merging
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartialSettings {
    pub project_root: Option<PathBuf>,
    pub ignore: Option<Vec<String>>,
    pub thresholds: Option<Thresholds>,
    pub debounce_ms: Option<u64>,
    pub churn_window_days: Option<u32>,
    pub parallel: Option<bool>,
    pub output_format: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
    pub use_colors: Option<bool>,
    pub show_progress: Option<bool>,
    pub quiet: Option<bool>,
    pub verbose: Option<bool>,
}

impl PartialSettings {
    /// Merge another PartialSettings into this one
    /// Fields from `other` take precedence over existing fields
    pub fn merge_from(&mut self, other: PartialSettings) {
        if other.project_root.is_some() {
            self.project_root = other.project_root;
        }
        if other.ignore.is_some() {
            self.ignore = other.ignore;
        }
        if other.thresholds.is_some() {
            self.thresholds = other.thresholds;
        }
        if other.debounce_ms.is_some() {
            self.debounce_ms = other.debounce_ms;
        }
        if other.churn_window_days.is_some() {
            self.churn_window_days = other.churn_window_days;
        }
        if other.parallel.is_some() {
            self.parallel = other.parallel;
        }
        if other.output_format.is_some() {
            self.output_format = other.output_format;
        }
        if other.output_file.is_some() {
            self.output_file = other.output_file;
        }
        if other.use_colors.is_some() {
            self.use_colors = other.use_colors;
        }
        if other.show_progress.is_some() {
            self.show_progress = other.show_progress;
        }
        if other.quiet.is_some() {
            self.quiet = other.quiet;
        }
        if other.verbose.is_some() {
            self.verbose = other.verbose;
        }
    }

    /// Convert partial settings to full settings
    /// Uses defaults for any fields that are None
    pub fn to_settings(&self) -> Settings {
        let defaults = Settings::default();

        Settings {
            project_root: self.project_root.clone().unwrap_or(defaults.project_root),
            ignore: self.ignore.clone().unwrap_or(defaults.ignore),
            thresholds: self.thresholds.unwrap_or(defaults.thresholds),
            debounce_ms: self.debounce_ms.unwrap_or(defaults.debounce_ms),
            churn_window_days: self.churn_window_days.unwrap_or(defaults.churn_window_days),
            parallel: self.parallel.unwrap_or(defaults.parallel),
            output_format: self.output_format.unwrap_or(defaults.output_format),
            output_file: self.output_file.clone().or(defaults.output_file),
            use_colors: self.use_colors.unwrap_or(defaults.use_colors),
            show_progress: self.show_progress.unwrap_or(defaults.show_progress),
            quiet: self.quiet.unwrap_or(defaults.quiet),
            verbose: self.verbose.unwrap_or(defaults.verbose),
        }
    }
}
