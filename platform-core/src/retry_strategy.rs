//! Retry strategy module.
//!
//! Decides whether a failed HTTP attempt is worth repeating. The decision is
//! a fixed table keyed on the kind of transport failure, the number of
//! executions so far and whether the request is idempotent:
//!
//! | Condition                                   | Retry? |
//! |---------------------------------------------|--------|
//! | `attempt_count >= max_attempts`             | no     |
//! | [`FailureKind::NoResponse`]                 | yes    |
//! | [`FailureKind::TlsHandshake`]               | no     |
//! | [`FailureKind::Timeout`]                    | no     |
//! | [`FailureKind::UnknownHost`]                | yes    |
//! | [`FailureKind::ConnectTimeout`]             | no     |
//! | [`FailureKind::Tls`]                        | no     |
//! | request carries a body                      | no     |
//! | otherwise                                   | yes    |
//!
//! Rows are evaluated top to bottom and the first match wins.

use crate::error::{ConfigValidationError, Error, ValidationResult};
use std::fmt;
use std::time::Duration;

/// Upper bound accepted by [`RetryConfig::validate`].
const MAX_ATTEMPTS_LIMIT: u32 = 20;

/// Kind of transport failure observed on one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The peer closed the connection before sending a response.
    NoResponse,
    /// The TLS handshake failed.
    TlsHandshake,
    /// Read or operation timeout after the connection was up.
    Timeout,
    /// DNS resolution failed.
    UnknownHost,
    /// Establishing the connection timed out.
    ConnectTimeout,
    /// Any other TLS failure.
    Tls,
    /// Any other I/O failure.
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::NoResponse => "no_response",
            FailureKind::TlsHandshake => "tls_handshake",
            FailureKind::Timeout => "timeout",
            FailureKind::UnknownHost => "unknown_host",
            FailureKind::ConnectTimeout => "connect_timeout",
            FailureKind::Tls => "tls",
            FailureKind::Io => "io",
        };
        f.write_str(name)
    }
}

/// Retry configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total number of executions allowed, the first one included.
    pub max_attempts: u32,
    /// Pause between attempts. Zero re-attempts immediately.
    pub retry_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            retry_delay: Duration::ZERO,
        }
    }
}

impl RetryConfig {
    /// Creates a configuration that never retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Default::default()
        }
    }

    /// Validates the retry configuration parameters.
    ///
    /// # Validation Rules
    ///
    /// - `max_attempts` must be in `1..=20`
    /// - a `retry_delay` above 10 seconds produces a warning
    ///
    /// # Example
    ///
    /// ```rust
    /// use platform_core::retry_strategy::RetryConfig;
    ///
    /// assert!(RetryConfig::default().validate().is_ok());
    ///
    /// let invalid = RetryConfig {
    ///     max_attempts: 0,
    ///     ..Default::default()
    /// };
    /// assert!(invalid.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<ValidationResult, ConfigValidationError> {
        let mut result = ValidationResult::new();

        if self.max_attempts == 0 {
            return Err(ConfigValidationError::too_low(
                "max_attempts",
                self.max_attempts,
                1,
            ));
        }
        if self.max_attempts > MAX_ATTEMPTS_LIMIT {
            return Err(ConfigValidationError::too_high(
                "max_attempts",
                self.max_attempts,
                MAX_ATTEMPTS_LIMIT,
            ));
        }
        if self.retry_delay > Duration::from_secs(10) {
            result.add_warning(format!(
                "retry_delay of {:?} stalls callers for a long time between attempts",
                self.retry_delay
            ));
        }

        Ok(result)
    }
}

/// Retry strategy.
#[derive(Debug, Clone, Default)]
pub struct RetryStrategy {
    config: RetryConfig,
}

impl RetryStrategy {
    /// Creates a new retry strategy with the given configuration.
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Creates a retry strategy with default configuration.
    pub fn default_strategy() -> Self {
        Self::new(RetryConfig::default())
    }

    /// Determines whether a failed attempt should be retried.
    ///
    /// `attempt_count` is the number of executions so far, so it is `1`
    /// after the first failure.
    ///
    /// ```rust
    /// use platform_core::retry_strategy::{FailureKind, RetryStrategy};
    ///
    /// let strategy = RetryStrategy::default_strategy();
    /// assert!(strategy.should_retry(FailureKind::UnknownHost, 1, false));
    /// assert!(!strategy.should_retry(FailureKind::Io, 1, false));
    /// assert!(!strategy.should_retry(FailureKind::NoResponse, 5, true));
    /// ```
    pub fn should_retry(&self, kind: FailureKind, attempt_count: u32, idempotent: bool) -> bool {
        if attempt_count >= self.config.max_attempts {
            return false;
        }
        match kind {
            FailureKind::NoResponse | FailureKind::UnknownHost => true,
            FailureKind::TlsHandshake
            | FailureKind::Timeout
            | FailureKind::ConnectTimeout
            | FailureKind::Tls => false,
            FailureKind::Io => idempotent,
        }
    }

    /// Applies [`should_retry`](Self::should_retry) to an SDK error.
    ///
    /// Only transport errors are retryable; everything else returns `false`.
    pub fn should_retry_error(&self, error: &Error, attempt_count: u32, idempotent: bool) -> bool {
        error
            .failure_kind()
            .is_some_and(|kind| self.should_retry(kind, attempt_count, idempotent))
    }

    /// Returns the pause to take before the next attempt.
    pub fn delay(&self) -> Duration {
        self.config.retry_delay
    }

    /// Returns a reference to the retry configuration.
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Returns the maximum number of executions.
    pub fn max_attempts(&self) -> u32 {
        self.config.max_attempts
    }
}
