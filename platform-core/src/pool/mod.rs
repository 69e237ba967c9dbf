//! Bounded connection pool
//!
//! Connections are keyed by [`Route`] (scheme, host, port). The pool never
//! holds more than `max_total` live connections overall nor more than
//! `max_per_route` for one route; callers beyond those limits wait up to
//! `lease_timeout` for a slot.
//!
//! A leased connection goes back to the pool through
//! [`ConnectionLease::release`]. A lease that is simply dropped counts as
//! a failed request and its connection is closed, so an early return or a
//! panic can never leak a slot.
//!
//! # Example
//!
//! ```rust,no_run
//! use platform_core::pool::{ConnectionPool, PoolConfig};
//! use url::Url;
//!
//! # async fn example() -> platform_core::error::Result<()> {
//! let pool = ConnectionPool::new(PoolConfig::default())?;
//! let url = Url::parse("http://open.example.com/api")?;
//!
//! let lease = pool.lease(&url).await?;
//! let response = lease.client().get(url).send().await;
//! lease.release(response.is_ok());
//! # Ok(())
//! # }
//! ```

mod config;
mod connection;
mod evictor;

#[cfg(test)]
mod tests;

pub use config::PoolConfig;
pub use connection::{PooledConnection, Route};
pub use evictor::{DEFAULT_EVICTION_INTERVAL, IdleEvictor};

use crate::error::{Error, Result};
use reqwest::Client;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::Instant;
use tracing::{debug, instrument, trace, warn};
use url::Url;

/// Snapshot of pool-wide counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Live connections, leased or idle.
    pub live: usize,
    /// Connections currently leased.
    pub leased: usize,
    /// Connections waiting in the pool.
    pub idle: usize,
    /// Routes with at least one live connection.
    pub routes: usize,
}

/// Snapshot of one route's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteStats {
    /// Live connections, leased or idle.
    pub live: usize,
    /// Connections currently leased.
    pub leased: usize,
    /// Connections waiting in the pool.
    pub idle: usize,
}

#[derive(Debug, Default)]
struct RouteSlot {
    // Oldest at the front; reuse takes from the back.
    idle: VecDeque<PooledConnection>,
    live: usize,
    leased: usize,
}

#[derive(Debug, Default)]
struct PoolState {
    routes: HashMap<Route, RouteSlot>,
    total_live: usize,
    next_id: u64,
    closed: bool,
}

impl PoolState {
    fn evict_oldest_idle_except(&mut self, keep: &Route) -> Option<PooledConnection> {
        let victim = self
            .routes
            .iter()
            .filter(|(route, _)| *route != keep)
            .filter_map(|(route, slot)| slot.idle.front().map(|c| (route, c.last_used())))
            .min_by_key(|(_, last_used)| *last_used)
            .map(|(route, _)| route.clone())?;

        let slot = self.routes.get_mut(&victim)?;
        let conn = slot.idle.pop_front()?;
        slot.live -= 1;
        self.total_live -= 1;
        Some(conn)
    }

    fn prune_empty_routes(&mut self) {
        self.routes.retain(|_, slot| slot.live > 0);
    }
}

enum Acquire {
    Reused(PooledConnection),
    Reserved { id: u64 },
    Saturated,
}

struct Shared {
    config: PoolConfig,
    state: Mutex<PoolState>,
    available: Notify,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn try_acquire(&self, route: &Route) -> Result<(Acquire, Vec<PooledConnection>)> {
        let mut guard = self.lock();
        let state = &mut *guard;
        if state.closed {
            return Err(Error::cancelled("Connection pool is shut down"));
        }

        let now = Instant::now();
        let mut discarded = Vec::new();

        let slot = state.routes.entry(route.clone()).or_default();
        while let Some(conn) = slot.idle.pop_back() {
            if conn.is_expired(now, &self.config) {
                slot.live -= 1;
                state.total_live -= 1;
                discarded.push(conn);
                continue;
            }
            slot.leased += 1;
            return Ok((Acquire::Reused(conn), discarded));
        }
        if slot.live >= self.config.max_per_route {
            return Ok((Acquire::Saturated, discarded));
        }

        if state.total_live >= self.config.max_total {
            match state.evict_oldest_idle_except(route) {
                Some(victim) => {
                    trace!(
                        connection_id = victim.id(),
                        route = %victim.route(),
                        "Closing idle connection of another route to make room"
                    );
                    discarded.push(victim);
                }
                None => return Ok((Acquire::Saturated, discarded)),
            }
        }

        let slot = state.routes.entry(route.clone()).or_default();
        slot.live += 1;
        slot.leased += 1;
        state.total_live += 1;
        let id = state.next_id;
        state.next_id += 1;
        Ok((Acquire::Reserved { id }, discarded))
    }

    fn cancel_reservation(&self, route: &Route) {
        {
            let mut guard = self.lock();
            let state = &mut *guard;
            if let Some(slot) = state.routes.get_mut(route) {
                slot.live -= 1;
                slot.leased -= 1;
                state.total_live -= 1;
            }
            state.prune_empty_routes();
        }
        self.available.notify_waiters();
    }

    fn give_back(&self, mut conn: PooledConnection, reusable: bool) {
        let now = Instant::now();
        let discarded = {
            let mut guard = self.lock();
            let state = &mut *guard;
            let closed = state.closed;
            let Some(slot) = state.routes.get_mut(conn.route()) else {
                return;
            };
            slot.leased -= 1;

            if reusable && !closed && !conn.is_past_ttl(now, &self.config) {
                conn.mark_returned(now);
                slot.idle.push_back(conn);
                None
            } else {
                slot.live -= 1;
                state.total_live -= 1;
                state.prune_empty_routes();
                Some(conn)
            }
        };
        if let Some(conn) = discarded {
            trace!(connection_id = conn.id(), "Discarded connection");
        }
        self.available.notify_waiters();
    }

    fn sweep<F>(&self, should_close: F) -> usize
    where
        F: Fn(&PooledConnection, Instant) -> bool,
    {
        let now = Instant::now();
        let mut closed = Vec::new();
        {
            let mut guard = self.lock();
            let state = &mut *guard;
            for slot in state.routes.values_mut() {
                let before = slot.idle.len();
                let mut kept = VecDeque::with_capacity(before);
                for conn in slot.idle.drain(..) {
                    if should_close(&conn, now) {
                        closed.push(conn);
                    } else {
                        kept.push_back(conn);
                    }
                }
                slot.idle = kept;
                slot.live -= before - slot.idle.len();
            }
            state.total_live -= closed.len();
            state.prune_empty_routes();
        }

        let count = closed.len();
        drop(closed);
        if count > 0 {
            self.available.notify_waiters();
        }
        count
    }
}

/// Bounded pool of reusable connections, cheap to clone.
#[derive(Clone)]
pub struct ConnectionPool {
    shared: Arc<Shared>,
}

impl ConnectionPool {
    /// Creates a pool.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration does not validate.
    pub fn new(config: PoolConfig) -> Result<Self> {
        let validation = config.validate()?;
        for warning in &validation.warnings {
            warn!(warning = %warning, "Connection pool configuration warning");
        }
        Ok(Self {
            shared: Arc::new(Shared {
                config,
                state: Mutex::new(PoolState::default()),
                available: Notify::new(),
            }),
        })
    }

    /// Returns the pool configuration.
    pub fn config(&self) -> &PoolConfig {
        &self.shared.config
    }

    /// Leases a connection for the route of `url`.
    ///
    /// An idle connection is reused when one is available; otherwise a new
    /// one is opened if the limits allow. When the pool is full but another
    /// route holds idle connections, the oldest of those is closed to make
    /// room.
    ///
    /// # Errors
    ///
    /// - [`Error::ResourceExhausted`] if no slot frees up within `lease_timeout`
    /// - [`Error::Cancelled`] if the pool is or gets shut down
    /// - [`Error::InvalidRequest`] if the URL has no host
    #[instrument(name = "pool_lease", skip(self, url), fields(route))]
    pub async fn lease(&self, url: &Url) -> Result<ConnectionLease> {
        let route = Route::from_url(url)?;
        tracing::Span::current().record("route", tracing::field::display(&route));

        let lease_timeout = self.shared.config.lease_timeout;
        let deadline = Instant::now() + lease_timeout;

        loop {
            let mut notified = std::pin::pin!(self.shared.available.notified());
            notified.as_mut().enable();

            let (acquired, discarded) = self.shared.try_acquire(&route)?;
            if !discarded.is_empty() {
                trace!(count = discarded.len(), "Closed expired connections during lease");
            }
            drop(discarded);

            match acquired {
                Acquire::Reused(conn) => {
                    trace!(connection_id = conn.id(), "Reusing idle connection");
                    return Ok(ConnectionLease::new(conn, Arc::clone(&self.shared)));
                }
                Acquire::Reserved { id } => {
                    return match PooledConnection::open(id, route.clone(), &self.shared.config) {
                        Ok(conn) => {
                            debug!(connection_id = id, "Opened pooled connection");
                            Ok(ConnectionLease::new(conn, Arc::clone(&self.shared)))
                        }
                        Err(e) => {
                            self.shared.cancel_reservation(&route);
                            Err(e)
                        }
                    };
                }
                Acquire::Saturated => {
                    trace!("Pool saturated, waiting for a free slot");
                }
            }

            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                warn!(
                    timeout_ms = %lease_timeout.as_millis(),
                    "Timed out waiting for a pooled connection"
                );
                return Err(Error::resource_exhausted(format!(
                    "No pooled connection for {route} within {}ms",
                    lease_timeout.as_millis()
                )));
            }
        }
    }

    /// Closes idle connections past `idle_timeout` or past `connection_ttl`.
    ///
    /// Returns the number of connections closed.
    pub fn close_expired(&self) -> usize {
        let config = &self.shared.config;
        self.shared.sweep(|conn, now| conn.is_expired(now, config))
    }

    /// Closes connections that have been idle longer than `threshold`.
    ///
    /// Returns the number of connections closed.
    pub fn close_idle(&self, threshold: Duration) -> usize {
        self.shared.sweep(|conn, now| conn.idle_for(now) > threshold)
    }

    /// Closes all idle connections and fails every pending and future lease.
    ///
    /// Leased connections are closed when they come back. Calling this more
    /// than once has no further effect.
    pub fn shutdown(&self) {
        let drained: Vec<PooledConnection> = {
            let mut guard = self.shared.lock();
            let state = &mut *guard;
            if state.closed {
                return;
            }
            state.closed = true;
            let mut drained = Vec::new();
            for slot in state.routes.values_mut() {
                slot.live -= slot.idle.len();
                drained.extend(slot.idle.drain(..));
            }
            state.total_live -= drained.len();
            state.prune_empty_routes();
            drained
        };
        debug!(closed = drained.len(), "Connection pool shut down");
        drop(drained);
        self.shared.available.notify_waiters();
    }

    /// Returns `true` once [`shutdown`](Self::shutdown) has been called.
    pub fn is_closed(&self) -> bool {
        self.shared.lock().closed
    }

    /// Returns pool-wide counters.
    pub fn stats(&self) -> PoolStats {
        let state = self.shared.lock();
        let (leased, idle) = state
            .routes
            .values()
            .fold((0, 0), |(leased, idle), slot| {
                (leased + slot.leased, idle + slot.idle.len())
            });
        PoolStats {
            live: state.total_live,
            leased,
            idle,
            routes: state.routes.values().filter(|slot| slot.live > 0).count(),
        }
    }

    /// Returns the counters of one route.
    pub fn route_stats(&self, route: &Route) -> RouteStats {
        self.shared
            .lock()
            .routes
            .get(route)
            .map(|slot| RouteStats {
                live: slot.live,
                leased: slot.leased,
                idle: slot.idle.len(),
            })
            .unwrap_or_default()
    }
}

impl fmt::Debug for ConnectionPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionPool")
            .field("config", &self.shared.config)
            .field("stats", &self.stats())
            .finish()
    }
}

/// Exclusive use of one pooled connection.
pub struct ConnectionLease {
    id: u64,
    route: Route,
    client: Client,
    conn: Option<PooledConnection>,
    reusable: bool,
    shared: Arc<Shared>,
}

impl ConnectionLease {
    fn new(conn: PooledConnection, shared: Arc<Shared>) -> Self {
        Self {
            id: conn.id(),
            route: conn.route().clone(),
            client: conn.client().clone(),
            conn: Some(conn),
            reusable: false,
            shared,
        }
    }

    /// Pool-unique id of the leased connection.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Route of the leased connection.
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Client bound to the leased connection.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Returns the connection to the pool.
    ///
    /// With `reusable == false` the connection is closed instead, which is
    /// what a failed or aborted exchange calls for.
    pub fn release(mut self, reusable: bool) {
        self.reusable = reusable;
    }
}

impl Drop for ConnectionLease {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            self.shared.give_back(conn, self.reusable);
        }
    }
}

impl fmt::Debug for ConnectionLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionLease")
            .field("id", &self.id)
            .field("route", &self.route.to_string())
            .finish_non_exhaustive()
    }
}
