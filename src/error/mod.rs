//! Error handling for Pulse
//!
//! Error types, the crate-wide result alias, and helpers for attaching context
//! and routing errors by severity.

pub mod context;
pub mod types;

pub use context::{OptionExt, ResultExt};
pub use types::{ErrorSeverity, PulseError, Result};
