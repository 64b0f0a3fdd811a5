//! Structural parser wrapper using OXC

use super::function_collector::FunctionCollector;
use crate::error::{PulseError, Result};
use crate::models::{FunctionMetrics, Language};
use oxc_allocator::Allocator;
use oxc_parser::{ParseOptions, Parser};
use oxc_span::SourceType;
use parking_lot::Mutex;
use std::path::Path;
use tracing::trace;

/// Pool of arena allocators reused across parses
///
/// `Allocator` is `Send` but not `Sync`, so the pool hands out owned
/// allocators instead of sharing them.
pub struct AllocatorPool {
    allocators: Mutex<Vec<Allocator>>,
}

impl AllocatorPool {
    /// Create a new allocator pool
    pub fn new(size: usize) -> Self {
        let allocators = (0..size).map(|_| Allocator::default()).collect();
        Self {
            allocators: Mutex::new(allocators),
        }
    }

    /// Take an allocator from the pool, creating one when the pool is empty
    pub fn take(&self) -> Allocator {
        self.allocators.lock().pop().unwrap_or_default()
    }

    /// Reset an allocator and return it to the pool
    pub fn give_back(&self, mut allocator: Allocator) {
        allocator.reset();
        self.allocators.lock().push(allocator);
    }

    pub fn available(&self) -> usize {
        self.allocators.lock().len()
    }
}

/// Structural function-metric extraction for the JavaScript family
pub struct StructuralParser {
    parse_options: ParseOptions,
    allocator_pool: AllocatorPool,
}

impl StructuralParser {
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions::default(),
            allocator_pool: AllocatorPool::new(num_cpus::get()),
        }
    }

    /// Parse `source` and collect per-function metrics
    ///
    /// A parser panic or any reported syntax error is a parse failure; the
    /// caller decides whether to degrade.
    pub fn extract_functions(
        &self,
        path: &Path,
        source: &str,
        language: Language,
    ) -> Result<Vec<FunctionMetrics>> {
        let source_type = Self::source_type(path, language);
        let allocator = self.allocator_pool.take();
        let outcome = self.parse_with(&allocator, path, source, source_type);
        self.allocator_pool.give_back(allocator);
        outcome
    }

    fn parse_with(
        &self,
        allocator: &Allocator,
        path: &Path,
        source: &str,
        source_type: SourceType,
    ) -> Result<Vec<FunctionMetrics>> {
        let ret = Parser::new(allocator, source, source_type)
            .with_options(self.parse_options.clone())
            .parse();

        if ret.panicked || !ret.errors.is_empty() {
            let message = ret
                .errors
                .first()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "parser aborted".to_string());
            return Err(PulseError::parse_error(path, message));
        }

        let functions = FunctionCollector::collect(source, &ret.program);
        trace!(path = %path.display(), functions = functions.len(), "structural parse complete");
        Ok(functions)
    }

    fn source_type(path: &Path, language: Language) -> SourceType {
        SourceType::from_path(path).unwrap_or_else(|_| match language {
            Language::TypeScript => SourceType::ts(),
            _ => SourceType::mjs(),
        })
    }
}

impl Default for StructuralParser {
    fn default() -> Self {
        Self::new()
    }
}
