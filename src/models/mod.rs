//! Data models and structures for Pulse

pub mod config;
pub mod dependency_graph;
pub mod metrics;
pub mod risk;

pub use config::{OutputFormat, PartialSettings, Settings, Thresholds};
pub use dependency_graph::ImportGraph;
pub use metrics::{ExtractionStrategy, FileMetrics, FunctionKind, FunctionMetrics, Language};
pub use risk::{FileEdge, RiskLevel, RiskScoreResult, ScanFailure, ScanResult};
