//! Per-function and per-file structural metrics

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Display name used for functions whose name cannot be resolved
pub const ANONYMOUS: &str = "anonymous";

/// Extensions (without the dot) of files Pulse analyses
pub const SUPPORTED_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs", "py"];

/// Source language of a file, decided purely from its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    TypeScript,
    JavaScript,
    Python,
    Unknown,
}

impl Language {
    /// Detect the language from a path's extension (case-insensitive)
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Unknown)
    }

    /// Detect the language from a bare extension without the leading dot
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "ts" | "tsx" | "mts" | "cts" => Language::TypeScript,
            "js" | "jsx" | "mjs" | "cjs" => Language::JavaScript,
            "py" => Language::Python,
            _ => Language::Unknown,
        }
    }

    pub fn is_supported_path(path: &Path) -> bool {
        Self::from_path(path) != Language::Unknown
    }

    /// Whether files of this language go through the structural parser
    pub fn supports_structural_parsing(self) -> bool {
        matches!(self, Language::TypeScript | Language::JavaScript)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Language::TypeScript => "typescript",
            Language::JavaScript => "javascript",
            Language::Python => "python",
            Language::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a function's name was resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum FunctionKind {
    /// The function carries its own identifier
    Named(String),
    /// Class method, getter, setter or constructor
    Method(String),
    /// Value bound to a variable, property or assignment target
    Bound(String),
    /// No resolvable name
    Anonymous,
}

impl FunctionKind {
    pub fn name(&self) -> &str {
        match self {
            FunctionKind::Named(name) | FunctionKind::Method(name) | FunctionKind::Bound(name) => {
                name
            }
            FunctionKind::Anonymous => ANONYMOUS,
        }
    }

    pub fn is_named(&self) -> bool {
        !matches!(self, FunctionKind::Anonymous)
    }
}

/// Structural metrics of one function-like construct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionMetrics {
    pub name: String,
    pub kind: FunctionKind,
    /// 1-based line of the first byte
    pub start_line: usize,
    /// Inclusive line span
    pub line_count: usize,
    pub cyclomatic_complexity: u32,
    pub parameter_count: u32,
    pub max_nesting_depth: u32,
}

impl FunctionMetrics {
    pub fn new(kind: FunctionKind, start_line: usize, line_count: usize) -> Self {
        Self {
            name: kind.name().to_string(),
            kind,
            start_line,
            line_count,
            cyclomatic_complexity: 1,
            parameter_count: 0,
            max_nesting_depth: 0,
        }
    }

    pub fn is_named(&self) -> bool {
        self.kind.is_named()
    }
}

/// Which extractor produced a file's metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStrategy {
    Structural,
    Heuristic,
}

/// Metrics for a whole file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMetrics {
    pub file_path: PathBuf,
    pub language: Language,
    pub total_lines: usize,
    pub total_functions: usize,
    /// Ordered by start position
    pub functions: Vec<FunctionMetrics>,
    pub strategy: ExtractionStrategy,
}

impl FileMetrics {
    pub fn new(
        file_path: PathBuf,
        language: Language,
        total_lines: usize,
        mut functions: Vec<FunctionMetrics>,
        strategy: ExtractionStrategy,
    ) -> Self {
        functions.sort_by_key(|f| f.start_line);
        Self {
            file_path,
            language,
            total_lines,
            total_functions: functions.len(),
            functions,
            strategy,
        }
    }

    /// Named functions only; anonymous ones are excluded from risk maxima
    pub fn named_functions(&self) -> impl Iterator<Item = &FunctionMetrics> {
        self.functions.iter().filter(|f| f.is_named())
    }
}

/// Line count as editors report it: a trailing newline does not open a new line
pub fn count_lines(source: &str) -> usize {
    source.lines().count()
}
