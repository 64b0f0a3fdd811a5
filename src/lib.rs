//! Pulse - per-file defect risk scoring
//!
//! Pulse walks a TypeScript, JavaScript or Python project, extracts
//! per-function structural metrics, reads recent churn from git, builds the
//! relative import graph and folds everything into a 0-100 risk score per file.
//! A watch mode re-runs the scan after each burst of filesystem changes.
//!
//! ```no_run
//! let result = pulse::scan(std::path::Path::new("./my-project"))?;
//! for file in result.files.iter().take(5) {
//!     println!("{:>5.1} {}", file.global_score, file.file_path.display());
//! }
//! # Ok::<(), pulse::PulseError>(())
//! ```

#![feature(error_generic_member_access)]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod output;
pub mod parsers;
pub mod scoring;
pub mod utils;
pub mod watch;

// Re-export commonly used types
pub use crate::core::{scan, Scanner};
pub use error::{ErrorSeverity, OptionExt, PulseError, Result, ResultExt};
pub use models::{
    FileEdge, FileMetrics, FunctionKind, FunctionMetrics, Language, RiskLevel, RiskScoreResult,
    ScanFailure, ScanResult, Settings, Thresholds,
};
pub use parsers::MetricExtractor;
pub use scoring::{ChurnSnapshot, GitHistory, HistoryProvider};
pub use watch::{ProjectWatcher, WatchHandle, WatchHandler};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
