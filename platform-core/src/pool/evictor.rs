//! Background eviction of expired idle connections.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::ConnectionPool;

/// Default wake-up period of the evictor.
pub const DEFAULT_EVICTION_INTERVAL: Duration = Duration::from_secs(3);

/// Periodic task that calls [`ConnectionPool::close_expired`].
///
/// The task sleeps for `interval` between sweeps and exits as soon as it is
/// cancelled, even in the middle of a sleep.
///
/// ```rust
/// use platform_core::pool::{ConnectionPool, IdleEvictor, PoolConfig};
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() -> platform_core::error::Result<()> {
/// let pool = ConnectionPool::new(PoolConfig::default())?;
/// let evictor = IdleEvictor::start(pool.clone(), Duration::from_secs(3));
/// assert!(evictor.is_running());
///
/// evictor.shutdown().await;
/// evictor.shutdown().await;
/// assert!(!evictor.is_running());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct IdleEvictor {
    cancel_token: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
    interval: Duration,
}

impl IdleEvictor {
    /// Spawns the eviction loop on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn start(pool: ConnectionPool, interval: Duration) -> Self {
        let cancel_token = CancellationToken::new();
        let token = cancel_token.clone();

        info!(interval_ms = %interval.as_millis(), "Starting idle connection evictor");
        let handle = tokio::spawn(Self::evict_loop(pool, interval, token));

        Self {
            cancel_token,
            task: Mutex::new(Some(handle)),
            interval,
        }
    }

    /// Wake-up period.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns `true` until [`shutdown`](Self::shutdown) has been requested.
    pub fn is_running(&self) -> bool {
        !self.cancel_token.is_cancelled()
    }

    /// Stops the loop and waits for it to exit. Idempotent.
    pub async fn shutdown(&self) {
        self.cancel_token.cancel();
        let handle = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                debug!(error = %e, "Idle connection evictor task ended abnormally");
            }
            info!("Idle connection evictor stopped");
        }
    }

    async fn evict_loop(pool: ConnectionPool, interval: Duration, cancel_token: CancellationToken) {
        loop {
            tokio::select! {
                biased;
                () = cancel_token.cancelled() => {
                    debug!("Idle connection evictor cancelled");
                    break;
                }
                () = tokio::time::sleep(interval) => {}
            }

            let closed = pool.close_expired();
            if closed > 0 {
                debug!(closed, "Closed expired idle connections");
            }
        }
    }
}

impl Drop for IdleEvictor {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}
