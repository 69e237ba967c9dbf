use crate::error::{Error, Result};
use reqwest::Client;
use std::fmt;
use tokio::time::Instant;
use url::Url;

use super::config::PoolConfig;

/// Destination a connection is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Route {
    scheme: String,
    host: String,
    port: u16,
}

impl Route {
    /// Creates a route.
    pub fn new(scheme: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            port,
        }
    }

    /// Derives the route of a URL, filling in the scheme's default port.
    ///
    /// ```rust
    /// use platform_core::pool::Route;
    /// use url::Url;
    ///
    /// let url = Url::parse("http://open.example.com/gateway/api").unwrap();
    /// let route = Route::from_url(&url).unwrap();
    /// assert_eq!(route.to_string(), "http://open.example.com:80");
    /// ```
    pub fn from_url(url: &Url) -> Result<Self> {
        let host = url
            .host_str()
            .ok_or_else(|| Error::invalid_request(format!("URL has no host: {url}")))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| Error::invalid_request(format!("URL has no port: {url}")))?;
        Ok(Self::new(url.scheme(), host, port))
    }

    /// URL scheme.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Host name or address.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port.
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.scheme, self.host, self.port)
    }
}

/// A reusable transport connection owned by the pool.
///
/// Each one wraps a `reqwest::Client` limited to a single keep-alive socket,
/// so dropping it closes that socket.
pub struct PooledConnection {
    id: u64,
    route: Route,
    client: Client,
    created_at: Instant,
    last_used: Instant,
    requests_served: u64,
}

impl PooledConnection {
    pub(super) fn open(id: u64, route: Route, config: &PoolConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.read_timeout)
            .pool_max_idle_per_host(1)
            .pool_idle_timeout(None)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::network(format!("Failed to build HTTP client: {e}")))?;

        let now = Instant::now();
        Ok(Self {
            id,
            route,
            client,
            created_at: now,
            last_used: now,
            requests_served: 0,
        })
    }

    /// Pool-unique connection id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Route the connection is bound to.
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Client used to send requests over this connection.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Number of requests completed and returned to the pool.
    pub fn requests_served(&self) -> u64 {
        self.requests_served
    }

    /// Time since the connection was returned to the pool.
    pub fn idle_for(&self, now: Instant) -> std::time::Duration {
        now.saturating_duration_since(self.last_used)
    }

    pub(super) fn is_expired(&self, now: Instant, config: &PoolConfig) -> bool {
        self.idle_for(now) > config.idle_timeout || self.is_past_ttl(now, config)
    }

    pub(super) fn is_past_ttl(&self, now: Instant, config: &PoolConfig) -> bool {
        config
            .connection_ttl
            .is_some_and(|ttl| now.saturating_duration_since(self.created_at) > ttl)
    }

    pub(super) fn mark_returned(&mut self, now: Instant) {
        self.last_used = now;
        self.requests_served += 1;
    }

    pub(super) fn last_used(&self) -> Instant {
        self.last_used
    }
}

impl fmt::Debug for PooledConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledConnection")
            .field("id", &self.id)
            .field("route", &self.route.to_string())
            .field("requests_served", &self.requests_served)
            .finish_non_exhaustive()
    }
}
