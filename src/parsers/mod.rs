//! Source parsing
//!
//! Structural (OXC) and heuristic (regex) metric extraction, relative import
//! extraction, and construction of the import graph.

pub mod ast_parser;
pub mod dependency_graph_builder;
pub mod extractor;
pub mod function_collector;
pub mod heuristic;
pub mod imports;

pub use ast_parser::{AllocatorPool, StructuralParser};
pub use dependency_graph_builder::DependencyGraphBuilder;
pub use extractor::MetricExtractor;
pub use function_collector::FunctionCollector;
