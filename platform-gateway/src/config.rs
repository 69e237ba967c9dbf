//! Gateway configuration and credentials.
//!
//! Both can be built in code or read from the environment. `from_env`
//! loads a `.env` file first when one is present.

use crate::constants::{endpoints, env};
use platform_core::error::{ConfigValidationError, Error, Result, ValidationResult};
use platform_core::http_client::HttpConfig;
use platform_core::pool::DEFAULT_EVICTION_INTERVAL;
use platform_core::SecretString;
use std::time::Duration;
use url::Url;

/// Configuration of one gateway endpoint.
///
/// # Example
///
/// ```rust
/// use platform_gateway::GatewayConfig;
/// use std::time::Duration;
///
/// let config = GatewayConfig {
///     base_url: "http://127.0.0.1:8080/gateway".to_string(),
///     eviction_interval: Duration::from_secs(1),
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Dataset invocation URL, without query
    pub base_url: String,
    /// Pool, retry and timeout settings of the underlying client
    pub http: HttpConfig,
    /// How often the idle evictor sweeps the pool
    pub eviction_interval: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: endpoints::DATASET_INVOKING.to_string(),
            http: HttpConfig::default(),
            eviction_interval: DEFAULT_EVICTION_INTERVAL,
        }
    }
}

impl GatewayConfig {
    /// Creates a configuration for `base_url` with default settings.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Reads the base URL from `PLATFORM_GATEWAY_URL`, falling back to the
    /// production endpoint.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        match lookup(env::GATEWAY_URL).filter(|url| !url.trim().is_empty()) {
            Some(url) => Self::new(url.trim()),
            None => Self::default(),
        }
    }

    /// Parses the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the URL is malformed or not HTTP(S).
    pub fn endpoint(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(
                "base_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        if url.host_str().is_none() {
            return Err(ConfigValidationError::missing("base_url.host").into());
        }
        Ok(url)
    }

    /// Validates the gateway configuration, including the HTTP settings.
    ///
    /// # Validation Rules
    ///
    /// - `base_url` must be an absolute HTTP(S) URL with a host
    /// - `eviction_interval` must be non-zero
    /// - HTTP rules as in [`HttpConfig::validate`]
    pub fn validate(&self) -> std::result::Result<ValidationResult, ConfigValidationError> {
        match self.endpoint() {
            Ok(url) => {
                if url.query().is_some() {
                    return Err(ConfigValidationError::invalid(
                        "base_url",
                        "must not carry a query string",
                    ));
                }
            }
            Err(Error::Config(e)) => return Err(e),
            Err(e) => return Err(ConfigValidationError::invalid("base_url", e.to_string())),
        }

        if self.eviction_interval.is_zero() {
            return Err(ConfigValidationError::too_low(
                "eviction_interval",
                "0ms",
                "1ms",
            ));
        }

        let mut result = ValidationResult::new();
        if self.eviction_interval > self.http.pool.idle_timeout {
            result.add_warning(format!(
                "eviction_interval {:?} is longer than idle_timeout {:?}; expired connections linger",
                self.eviction_interval, self.http.pool.idle_timeout
            ));
        }
        result.merge(self.http.validate()?);
        Ok(result)
    }
}

/// Application id and shared secret issued by the platform.
///
/// The secret is zeroized on drop and redacted from `Debug` output.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Application id
    pub app_id: i64,
    /// Signing secret
    pub secret: SecretString,
}

impl Credentials {
    /// Creates credentials.
    pub fn new(app_id: i64, secret: impl Into<SecretString>) -> Self {
        Self {
            app_id,
            secret: secret.into(),
        }
    }

    /// Reads `PLATFORM_APP_ID` and `PLATFORM_SECRET_KEY`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if either variable is missing or the id is
    /// not a decimal integer.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let raw_id = lookup(env::APP_ID).ok_or(ConfigValidationError::missing("app_id"))?;
        let app_id = raw_id
            .trim()
            .parse::<i64>()
            .map_err(|e| Error::config("app_id", format!("not an integer: {e}")))?;

        let secret = lookup(env::SECRET_KEY)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigValidationError::missing("secret"))?;

        Ok(Self::new(app_id, secret))
    }
}
