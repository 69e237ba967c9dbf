//! Connection pool bound tests under concurrent load.
//!
//! Many tasks lease across several routes at once; the global and per-route
//! caps must hold at every instant, and every task must eventually get a
//! connection.

#![allow(clippy::disallowed_methods)] // unwrap() is acceptable in tests

use platform_core::pool::{ConnectionPool, IdleEvictor, PoolConfig, Route};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use url::Url;

struct Gauge {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl Gauge {
    fn new() -> Self {
        Self {
            current: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }

    fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

fn route_url(index: usize) -> Url {
    Url::parse(&format!("http://route-{index}.internal:8080/gateway")).unwrap()
}

async fn hammer(pool: ConnectionPool, routes: usize, tasks_per_route: usize) -> (Gauge, Vec<Gauge>) {
    let total = Arc::new(Gauge::new());
    let per_route: Arc<Vec<Gauge>> = Arc::new((0..routes).map(|_| Gauge::new()).collect());

    let handles = (0..routes * tasks_per_route).map(|i| {
        let pool = pool.clone();
        let total = Arc::clone(&total);
        let per_route = Arc::clone(&per_route);
        tokio::spawn(async move {
            let index = i % routes;
            let lease = pool.lease(&route_url(index)).await.unwrap();
            total.enter();
            per_route[index].enter();

            let stats = pool.stats();
            assert!(stats.live <= pool.config().max_total, "{stats:?}");

            tokio::time::sleep(Duration::from_millis(10)).await;

            per_route[index].exit();
            total.exit();
            lease.release(true);
        })
    });
    for result in futures::future::join_all(handles).await {
        result.unwrap();
    }

    let total = Arc::try_unwrap(total).ok().unwrap();
    let per_route = Arc::try_unwrap(per_route).ok().unwrap();
    (total, per_route)
}

#[tokio::test(start_paused = true)]
async fn test_global_cap_holds_across_routes() {
    let pool = ConnectionPool::new(PoolConfig::default()).unwrap();

    let (total, per_route) = hammer(pool.clone(), 10, 15).await;

    assert_eq!(total.peak(), 100);
    assert!(per_route.iter().all(|g| g.peak() <= 20));

    let stats = pool.stats();
    assert!(stats.live <= 100);
    assert_eq!(stats.leased, 0);
    assert_eq!(stats.live, stats.idle);
}

#[tokio::test(start_paused = true)]
async fn test_per_route_cap_holds_on_single_route() {
    let pool = ConnectionPool::new(PoolConfig::default()).unwrap();

    let (total, per_route) = hammer(pool.clone(), 1, 45).await;

    assert_eq!(total.peak(), 20);
    assert_eq!(per_route[0].peak(), 20);

    let route = Route::from_url(&route_url(0)).unwrap();
    let stats = pool.route_stats(&route);
    assert_eq!(stats.live, 20);
    assert_eq!(stats.idle, 20);
}

#[tokio::test(start_paused = true)]
async fn test_custom_caps_hold() {
    let pool = ConnectionPool::new(PoolConfig {
        max_total: 8,
        max_per_route: 3,
        ..Default::default()
    })
    .unwrap();

    let (total, per_route) = hammer(pool.clone(), 4, 6).await;

    assert_eq!(total.peak(), 8);
    assert!(per_route.iter().all(|g| g.peak() <= 3));
}

#[tokio::test(start_paused = true)]
async fn test_evictor_drains_pool_after_load() {
    let pool = ConnectionPool::new(PoolConfig {
        idle_timeout: Duration::from_secs(5),
        ..Default::default()
    })
    .unwrap();
    let evictor = IdleEvictor::start(pool.clone(), Duration::from_secs(3));

    hammer(pool.clone(), 5, 10).await;
    assert_eq!(pool.stats().idle, 50);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(pool.stats().idle, 50);

    tokio::time::sleep(Duration::from_secs(7)).await;
    assert_eq!(pool.stats().live, 0);

    evictor.shutdown().await;
    assert!(!evictor.is_running());
}
