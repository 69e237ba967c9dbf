//! Parsing-related error types.

use std::borrow::Cow;
use thiserror::Error;

/// Errors raised while decoding gateway responses.
///
/// ```rust
/// use platform_core::error::ParseError;
///
/// let err = ParseError::missing_field("sign");
/// assert!(err.to_string().contains("sign"));
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ParseError {
    /// Failed to deserialize JSON.
    #[error("Failed to deserialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Missing required field in response.
    #[error("Missing required field: {0}")]
    MissingField(Cow<'static, str>),

    /// Invalid value for a field.
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue {
        /// Field name
        field: Cow<'static, str>,
        /// Error message
        message: Cow<'static, str>,
    },
}

impl ParseError {
    /// Creates a `MissingField` error.
    pub fn missing_field(field: impl Into<Cow<'static, str>>) -> Self {
        Self::MissingField(field.into())
    }

    /// Creates an `InvalidValue` error.
    pub fn invalid_value(
        field: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}
