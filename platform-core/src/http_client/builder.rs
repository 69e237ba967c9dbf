use crate::error::Result;
use crate::pool::ConnectionPool;
use crate::retry_strategy::RetryStrategy;
use tracing::warn;

use super::config::HttpConfig;

/// HTTP client over a bounded connection pool
#[derive(Debug, Clone)]
pub struct HttpClient {
    pool: ConnectionPool,
    config: HttpConfig,
    retry_strategy: RetryStrategy,
}

impl HttpClient {
    /// Creates a new HTTP client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::error::Error::Config) if the
    /// configuration does not validate.
    pub fn new(config: HttpConfig) -> Result<Self> {
        let validation = config.validate()?;
        for warning in &validation.warnings {
            warn!(warning = %warning, "HTTP client configuration warning");
        }

        let pool = ConnectionPool::new(config.pool.clone())?;
        let retry_strategy = RetryStrategy::new(config.retry_config.clone());

        Ok(Self {
            pool,
            config,
            retry_strategy,
        })
    }

    /// Returns a reference to current HTTP configuration.
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Returns the connection pool shared by all clones of this client.
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Closes the pool; later calls fail with `Error::Cancelled`.
    pub fn shutdown(&self) {
        self.pool.shutdown();
    }

    pub(crate) fn retry_strategy(&self) -> &RetryStrategy {
        &self.retry_strategy
    }
}
