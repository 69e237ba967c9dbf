//! Network-related error types.

use crate::retry_strategy::FailureKind;
use std::error::Error as StdError;
use thiserror::Error;

/// Encapsulated transport errors hiding `reqwest` from the public API.
///
/// Each variant maps onto exactly one [`FailureKind`], which is what the
/// retry policy decides on.
///
/// # Example
///
/// ```rust
/// use platform_core::error::NetworkError;
/// use platform_core::retry_strategy::FailureKind;
///
/// let err = NetworkError::DnsResolution("open.example.invalid".into());
/// assert_eq!(err.failure_kind(), FailureKind::UnknownHost);
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum NetworkError {
    /// The peer closed the connection before sending a response.
    #[error("Server closed connection without response: {0}")]
    NoResponse(String),

    /// TLS handshake failed.
    #[error("TLS handshake failed: {0}")]
    TlsHandshake(String),

    /// Read or operation timed out after the connection was established.
    #[error("Request timeout")]
    Timeout,

    /// DNS resolution failed.
    #[error("DNS resolution failed: {0}")]
    DnsResolution(String),

    /// Connecting to the peer timed out.
    #[error("Connect timeout")]
    ConnectTimeout,

    /// Any other SSL/TLS error.
    #[error("SSL/TLS error: {0}")]
    Ssl(String),

    /// Unclassified connection or I/O failure.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Opaque transport error for underlying issues.
    #[error("Transport error")]
    Transport(#[source] Box<dyn StdError + Send + Sync + 'static>),
}

impl NetworkError {
    /// Returns the failure kind the retry policy keys on.
    #[must_use]
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            NetworkError::NoResponse(_) => FailureKind::NoResponse,
            NetworkError::TlsHandshake(_) => FailureKind::TlsHandshake,
            NetworkError::Timeout => FailureKind::Timeout,
            NetworkError::DnsResolution(_) => FailureKind::UnknownHost,
            NetworkError::ConnectTimeout => FailureKind::ConnectTimeout,
            NetworkError::Ssl(_) => FailureKind::Tls,
            NetworkError::ConnectionFailed(_) | NetworkError::Transport(_) => FailureKind::Io,
        }
    }

    /// Returns `true` when the connection that produced this error must not
    /// be handed back to the pool.
    #[must_use]
    pub fn poisons_connection(&self) -> bool {
        !matches!(
            self,
            NetworkError::DnsResolution(_) | NetworkError::ConnectTimeout
        )
    }
}
