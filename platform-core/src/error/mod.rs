//! # Error Handling for the Platform SDK
//!
//! Strongly-typed errors built on `thiserror`. All public enums are
//! `#[non_exhaustive]`, large variants are boxed, and every error type is
//! `Send + Sync + 'static`.
//!
//! ## Error Hierarchy
//!
//! ```text
//! Error (main error type)
//! ├── Network           - Transport faults, classified for the retry policy (via NetworkError)
//! ├── Config            - Invalid configuration (via ConfigValidationError)
//! ├── Authentication    - Response signature did not verify
//! ├── InvalidRequest    - Request could not be built
//! ├── Parse             - Response decoding errors (via ParseError)
//! ├── Timeout           - Per-call deadline exceeded
//! ├── ResourceExhausted - No pooled connection became available in time
//! ├── Cancelled         - The pool was shut down
//! └── Context           - Error with additional context
//! ```
//!
//! A non-200 gateway response is deliberately *not* an error: the invoker
//! returns `Ok(None)` for it. A signature mismatch is a `false` from
//! [`crate::sign::verify`]; only the convenience client turns it into
//! [`Error::Authentication`].
//!
//! ## Quick Start
//!
//! ```rust
//! use platform_core::error::{Error, Result, ContextExt};
//!
//! fn lookup(data_id: i64) -> Result<i64> {
//!     if data_id <= 0 {
//!         return Err(Error::invalid_request("dataId must be positive"));
//!     }
//!     Ok(data_id)
//! }
//!
//! let err = lookup(0).context("Failed to prepare gateway call").unwrap_err();
//! assert!(err.report().contains("dataId must be positive"));
//! ```
//!
//! ## Secrets
//!
//! No constructor in this module ever receives the shared secret. Messages
//! built from transport errors are truncated to 1 KiB.

mod config;
mod context;
mod convert;
mod network;
mod parse;

use std::borrow::Cow;
use std::error::Error as StdError;
use thiserror::Error;

pub use config::{ConfigValidationError, ValidationResult};
pub use context::ContextExt;
pub use network::NetworkError;
pub use parse::ParseError;

use crate::retry_strategy::FailureKind;

/// Result type alias for all SDK operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The primary error type of the SDK.
///
/// # Example
///
/// ```rust
/// use platform_core::error::Error;
///
/// let err = Error::authentication("Response signature mismatch");
/// assert!(err.to_string().contains("signature mismatch"));
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Transport-level failure. Boxed to reduce enum size.
    #[error("Network error: {0}")]
    Network(Box<NetworkError>),

    /// Configuration rejected at construction time.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigValidationError),

    /// Authentication failure (response signature did not verify).
    #[error("Authentication error: {0}")]
    Authentication(Cow<'static, str>),

    /// The request could not be built.
    #[error("Invalid request: {0}")]
    InvalidRequest(Cow<'static, str>),

    /// Errors during response parsing. Boxed to reduce enum size.
    #[error("Parse error: {0}")]
    Parse(Box<ParseError>),

    /// Per-call deadline exceeded.
    #[error("Timeout: {0}")]
    Timeout(Cow<'static, str>),

    /// No pooled connection became available within the lease timeout.
    #[error("Resource exhausted: {0}")]
    ResourceExhausted(Cow<'static, str>),

    /// The operation was abandoned because its owner shut down.
    #[error("Cancelled: {0}")]
    Cancelled(Cow<'static, str>),

    /// Error with additional context, preserving the error chain.
    #[error("{context}")]
    Context {
        /// Context message describing what operation failed
        context: String,
        /// The underlying error
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    // ==================== Constructor Methods ====================

    /// Creates an authentication error.
    pub fn authentication(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Creates a network error for an unclassified I/O failure.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(Box::new(NetworkError::ConnectionFailed(msg.into())))
    }

    /// Creates an invalid request error.
    pub fn invalid_request(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Creates a timeout error.
    pub fn timeout(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Creates a resource exhausted error.
    ///
    /// ```rust
    /// use platform_core::error::Error;
    ///
    /// let err = Error::resource_exhausted("No pooled connection within 30000ms");
    /// assert!(err.to_string().contains("Resource exhausted"));
    /// ```
    pub fn resource_exhausted(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::ResourceExhausted(msg.into())
    }

    /// Creates a cancelled error.
    pub fn cancelled(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Cancelled(msg.into())
    }

    /// Creates a configuration error for an invalid field value.
    pub fn config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Config(ConfigValidationError::invalid(field, reason))
    }

    // ==================== Context Methods ====================

    /// Attaches context to an existing error.
    ///
    /// ```rust
    /// use platform_core::error::Error;
    ///
    /// let err = Error::network("Connection refused").context("Failed to call dataset 12");
    /// assert!(err.report().contains("Connection refused"));
    /// ```
    #[must_use]
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    // ==================== Chain Traversal Methods ====================

    fn iter_chain(&self) -> impl Iterator<Item = &Error> {
        std::iter::successors(Some(self), |err| match err {
            Error::Context { source, .. } => Some(source.as_ref()),
            _ => None,
        })
    }

    /// Returns the root cause of the error, skipping Context layers.
    #[must_use]
    pub fn root_cause(&self) -> &Error {
        self.iter_chain().last().unwrap_or(self)
    }

    /// Generates a detailed error report with the full chain.
    #[must_use]
    pub fn report(&self) -> String {
        use std::fmt::Write;
        let mut report = String::new();
        report.push_str(&self.to_string());

        let mut current: Option<&(dyn StdError + 'static)> = self.source();
        while let Some(err) = current {
            let _ = write!(report, "\nCaused by: {err}");
            current = err.source();
        }
        report
    }

    // ==================== Helper Methods (Context Penetrating) ====================

    /// Returns the transport failure kind, if this is a network error
    /// (penetrates Context layers).
    #[must_use]
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self.root_cause() {
            Error::Network(ne) => Some(ne.failure_kind()),
            _ => None,
        }
    }

    /// Checks if this is a network error (penetrates Context layers).
    #[must_use]
    pub fn as_network(&self) -> Option<&NetworkError> {
        match self.root_cause() {
            Error::Network(ne) => Some(ne.as_ref()),
            _ => None,
        }
    }

    /// Checks if this is an authentication error (penetrates Context layers).
    #[must_use]
    pub fn as_authentication(&self) -> Option<&str> {
        match self.root_cause() {
            Error::Authentication(msg) => Some(msg.as_ref()),
            _ => None,
        }
    }

    /// Checks if this is a resource exhausted error (penetrates Context layers).
    #[must_use]
    pub fn as_resource_exhausted(&self) -> Option<&str> {
        match self.root_cause() {
            Error::ResourceExhausted(msg) => Some(msg.as_ref()),
            _ => None,
        }
    }

    /// Checks if this is a cancelled error (penetrates Context layers).
    #[must_use]
    pub fn as_cancelled(&self) -> Option<&str> {
        match self.root_cause() {
            Error::Cancelled(msg) => Some(msg.as_ref()),
            _ => None,
        }
    }

    /// Checks if this is a configuration error (penetrates Context layers).
    #[must_use]
    pub fn as_config(&self) -> Option<&ConfigValidationError> {
        match self.root_cause() {
            Error::Config(e) => Some(e),
            _ => None,
        }
    }
}
