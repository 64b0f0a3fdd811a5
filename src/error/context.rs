//! Error context utilities for Pulse
//!
//! Helpers for attaching a message to foreign errors and for turning a
//! missing value into a typed error.

use crate::error::{PulseError, Result};

/// Extension trait for Result to add context to errors
pub trait ResultExt<T, E> {
    /// Add context to an error with a custom message
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error + 'static,
{
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display,
    {
        self.map_err(|err| PulseError::config_error(format!("{}: {}", context(), err)))
    }
}

/// Extension trait for Option to convert to Result with a custom error
pub trait OptionExt<T> {
    fn ok_or_error<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> PulseError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_error<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> PulseError,
    {
        self.ok_or_else(err_fn)
    }
}
