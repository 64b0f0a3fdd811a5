//! Shared utilities

pub mod path_resolver;

pub use path_resolver::{normalize, ImportResolver};
