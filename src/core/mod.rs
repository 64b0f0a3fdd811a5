//! Core scan pipeline: discovery, per-file analysis, churn cache and orchestration

pub mod analyzer;
pub mod cache;
pub mod parallel;
pub mod scanner;
pub mod walker;

pub use analyzer::{AnalyzedFile, Analyzer};
pub use cache::ChurnCache;
pub use parallel::{ProgressUpdate, WorkerPool};
pub use scanner::{scan, Scanner};
pub use walker::{is_source_file, Discovery, IgnoreList, SourceWalker};
