use crate::error::{ConfigValidationError, ValidationResult};
use crate::pool::PoolConfig;
use crate::retry_strategy::RetryConfig;
use std::time::Duration;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Connection pool limits and socket timeouts
    pub pool: PoolConfig,
    /// Retry decision parameters
    pub retry_config: RetryConfig,
    /// Optional deadline for one logical call, all attempts included
    ///
    /// Default: `None` (each attempt is bounded by the pool's socket timeouts only)
    pub call_timeout: Option<Duration>,
    /// Maximum response body size in bytes (default: 10MB)
    ///
    /// Responses exceeding this limit are rejected with an `InvalidRequest` error.
    pub max_response_size: usize,
    /// Whether to log request and response bodies at debug level
    pub verbose: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            pool: PoolConfig::default(),
            retry_config: RetryConfig::default(),
            call_timeout: None,
            max_response_size: 10 * 1024 * 1024,
            verbose: false,
        }
    }
}

impl HttpConfig {
    /// Validates the HTTP configuration, including the pool and retry settings.
    ///
    /// # Validation Rules
    ///
    /// - `call_timeout` must be non-zero and at most 5 minutes
    /// - `max_response_size` cannot be zero
    /// - pool and retry rules as in [`PoolConfig::validate`] and
    ///   [`RetryConfig::validate`]
    ///
    /// # Example
    ///
    /// ```rust
    /// use platform_core::http_client::HttpConfig;
    /// use std::time::Duration;
    ///
    /// assert!(HttpConfig::default().validate().is_ok());
    ///
    /// let invalid = HttpConfig {
    ///     call_timeout: Some(Duration::from_secs(600)),
    ///     ..Default::default()
    /// };
    /// assert!(invalid.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<ValidationResult, ConfigValidationError> {
        let mut result = self.pool.validate()?;
        result.merge(self.retry_config.validate()?);

        if let Some(limit) = self.call_timeout {
            if limit.is_zero() {
                return Err(ConfigValidationError::invalid(
                    "call_timeout",
                    "call_timeout cannot be zero",
                ));
            }
            if limit > Duration::from_secs(300) {
                return Err(ConfigValidationError::too_high(
                    "call_timeout",
                    format!("{limit:?}"),
                    "5 minutes",
                ));
            }
            if limit < self.pool.connect_timeout {
                result.add_warning(format!(
                    "call_timeout {limit:?} is shorter than connect_timeout {:?}",
                    self.pool.connect_timeout
                ));
            }
        }

        if self.max_response_size == 0 {
            return Err(ConfigValidationError::invalid(
                "max_response_size",
                "max_response_size cannot be zero",
            ));
        }

        Ok(result)
    }
}
