//! Per-file metric extraction with structural-to-heuristic degradation

use super::ast_parser::StructuralParser;
use super::heuristic;
use crate::error::{PulseError, Result};
use crate::models::metrics::count_lines;
use crate::models::{ExtractionStrategy, FileMetrics, Language};
use std::fs;
use std::path::Path;
use tracing::warn;

/// Turns one file's source into [`FileMetrics`]
///
/// Languages with structural support go through the OXC parser; when it
/// rejects a file the same text is measured heuristically instead, so
/// extraction itself never fails.
pub struct MetricExtractor {
    structural: StructuralParser,
}

impl MetricExtractor {
    pub fn new() -> Self {
        Self {
            structural: StructuralParser::new(),
        }
    }

    pub fn extract(&self, path: &Path, source: &str, language: Language) -> FileMetrics {
        let total_lines = count_lines(source);

        if language.supports_structural_parsing() {
            match self.structural.extract_functions(path, source, language) {
                Ok(functions) => {
                    return FileMetrics::new(
                        path.to_path_buf(),
                        language,
                        total_lines,
                        functions,
                        ExtractionStrategy::Structural,
                    );
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        reason = %err,
                        "structural parse failed, using heuristic extraction"
                    );
                }
            }
        }

        FileMetrics::new(
            path.to_path_buf(),
            language,
            total_lines,
            heuristic::extract_functions(source, language),
            ExtractionStrategy::Heuristic,
        )
    }

    /// Read `path` and extract its metrics
    pub fn extract_file(&self, path: &Path) -> Result<FileMetrics> {
        let source = fs::read_to_string(path).map_err(|e| PulseError::read_error(path, e))?;
        Ok(self.extract(path, &source, Language::from_path(path)))
    }
}

impl Default for MetricExtractor {
    fn default() -> Self {
        Self::new()
    }
}
