use crate::error::{ConfigValidationError, ValidationResult};
use std::time::Duration;

/// Connection pool configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Maximum live connections across all routes (default: 100)
    pub max_total: usize,
    /// Maximum live connections per route (default: 20)
    pub max_per_route: usize,
    /// How long `lease` waits for a free slot before giving up (default: 30 seconds)
    pub lease_timeout: Duration,
    /// Idle connections older than this are closed by `close_expired` (default: 30 seconds)
    pub idle_timeout: Duration,
    /// Optional maximum lifetime of a connection, idle or not
    pub connection_ttl: Option<Duration>,
    /// TCP connect timeout (default: 10 seconds)
    pub connect_timeout: Duration,
    /// Per-request deadline once connected (default: 30 seconds)
    pub read_timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_total: 100,
            max_per_route: 20,
            lease_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(30),
            connection_ttl: None,
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(30),
            user_agent: format!("platform-sdk/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl PoolConfig {
    /// Validates the pool limits.
    ///
    /// # Validation Rules
    ///
    /// - `max_total` and `max_per_route` must be at least 1
    /// - `max_per_route` must not exceed `max_total`
    /// - `lease_timeout` must be non-zero; below one second is a warning
    /// - a `connection_ttl` shorter than `idle_timeout` is a warning
    ///
    /// ```rust
    /// use platform_core::pool::PoolConfig;
    ///
    /// assert!(PoolConfig::default().validate().is_ok());
    ///
    /// let invalid = PoolConfig {
    ///     max_total: 10,
    ///     max_per_route: 20,
    ///     ..Default::default()
    /// };
    /// assert!(invalid.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<ValidationResult, ConfigValidationError> {
        let mut result = ValidationResult::new();

        if self.max_total == 0 {
            return Err(ConfigValidationError::too_low("max_total", 0, 1));
        }
        if self.max_per_route == 0 {
            return Err(ConfigValidationError::too_low("max_per_route", 0, 1));
        }
        if self.max_per_route > self.max_total {
            return Err(ConfigValidationError::too_high(
                "max_per_route",
                self.max_per_route,
                self.max_total,
            ));
        }
        if self.lease_timeout.is_zero() {
            return Err(ConfigValidationError::invalid(
                "lease_timeout",
                "lease_timeout cannot be zero",
            ));
        }
        if self.lease_timeout < Duration::from_secs(1) {
            result.add_warning(format!(
                "lease_timeout {:?} is very short, callers may fail under load",
                self.lease_timeout
            ));
        }
        if let Some(ttl) = self.connection_ttl
            && ttl < self.idle_timeout
        {
            result.add_warning(format!(
                "connection_ttl {ttl:?} is shorter than idle_timeout {:?}",
                self.idle_timeout
            ));
        }

        Ok(result)
    }
}
