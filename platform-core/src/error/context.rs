//! Context attachment trait and implementations.

use crate::error::{Error, Result};
use std::fmt;

/// Extension trait for ergonomic error context attachment.
///
/// Works on both `Result<T, E>` (where `E: Into<Error>`) and `Option<T>`.
/// Use `with_context()` when the message is expensive to build; it is only
/// evaluated on error.
///
/// ```rust
/// use platform_core::error::{Result, ContextExt};
///
/// fn response_sign(json: &serde_json::Value) -> Result<&str> {
///     json.get("sign")
///         .and_then(|v| v.as_str())
///         .context("Missing 'sign' in gateway response")
/// }
///
/// assert!(response_sign(&serde_json::json!({})).is_err());
/// ```
pub trait ContextExt<T, E> {
    /// Adds context to an error.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Adds lazy context to an error (only evaluated on error).
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> ContextExt<T, E> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| e.into().context(context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| e.into().context(f().to_string()))
    }
}

impl<T> ContextExt<T, Error> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::invalid_request(context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| Error::invalid_request(f().to_string()))
    }
}
