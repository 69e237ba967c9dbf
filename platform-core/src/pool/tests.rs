#![allow(clippy::disallowed_methods)] // unwrap() is acceptable in tests

use super::*;
use std::time::Duration;

fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

fn small_pool(max_total: usize, max_per_route: usize) -> ConnectionPool {
    ConnectionPool::new(PoolConfig {
        max_total,
        max_per_route,
        lease_timeout: Duration::from_millis(50),
        ..Default::default()
    })
    .unwrap()
}

#[test]
fn test_pool_config_defaults() {
    let config = PoolConfig::default();
    assert_eq!(config.max_total, 100);
    assert_eq!(config.max_per_route, 20);
    assert!(config.validate().unwrap().is_ok());
}

#[test]
fn test_pool_config_validation() {
    let zero = PoolConfig {
        max_total: 0,
        ..Default::default()
    };
    assert_eq!(zero.validate().unwrap_err().field_name(), "max_total");

    let inverted = PoolConfig {
        max_total: 5,
        max_per_route: 6,
        ..Default::default()
    };
    assert_eq!(inverted.validate().unwrap_err().field_name(), "max_per_route");

    let short_ttl = PoolConfig {
        connection_ttl: Some(Duration::from_secs(1)),
        ..Default::default()
    };
    assert!(short_ttl.validate().unwrap().has_warnings());

    assert!(ConnectionPool::new(zero).is_err());
}

#[test]
fn test_route_from_url() {
    let route = Route::from_url(&url("https://gateway.example.com/api?x=1")).unwrap();
    assert_eq!(route.scheme(), "https");
    assert_eq!(route.host(), "gateway.example.com");
    assert_eq!(route.port(), 443);

    let explicit = Route::from_url(&url("http://127.0.0.1:8080/")).unwrap();
    assert_eq!(explicit.to_string(), "http://127.0.0.1:8080");

    let err = Route::from_url(&url("data:text/plain,hello")).unwrap_err();
    assert!(matches!(err, Error::InvalidRequest(_)));
}

#[tokio::test]
async fn test_released_connection_is_reused() {
    let pool = small_pool(10, 5);
    let target = url("http://127.0.0.1:1/api");

    let lease = pool.lease(&target).await.unwrap();
    let first_id = lease.id();
    assert_eq!(pool.stats().leased, 1);
    lease.release(true);

    let stats = pool.stats();
    assert_eq!(stats.live, 1);
    assert_eq!(stats.idle, 1);
    assert_eq!(stats.leased, 0);

    let again = pool.lease(&target).await.unwrap();
    assert_eq!(again.id(), first_id);
    assert_eq!(pool.stats().live, 1);
}

#[tokio::test]
async fn test_dropped_lease_discards_connection() {
    let pool = small_pool(10, 5);
    let target = url("http://127.0.0.1:1/api");

    let lease = pool.lease(&target).await.unwrap();
    drop(lease);
    assert_eq!(pool.stats(), PoolStats::default());

    let lease = pool.lease(&target).await.unwrap();
    lease.release(false);
    assert_eq!(pool.stats().live, 0);
}

#[tokio::test(start_paused = true)]
async fn test_per_route_cap_exhausts() {
    let pool = small_pool(10, 2);
    let target = url("http://127.0.0.1:1/api");

    let _a = pool.lease(&target).await.unwrap();
    let _b = pool.lease(&target).await.unwrap();
    let err = pool.lease(&target).await.unwrap_err();
    assert!(err.as_resource_exhausted().is_some());

    let route = Route::from_url(&target).unwrap();
    assert_eq!(pool.route_stats(&route).live, 2);

    let other = pool.lease(&url("http://127.0.0.2:1/api")).await.unwrap();
    other.release(true);
    assert_eq!(pool.stats().live, 3);
}

#[tokio::test(start_paused = true)]
async fn test_waiter_woken_by_release() {
    let pool = ConnectionPool::new(PoolConfig {
        max_total: 1,
        max_per_route: 1,
        lease_timeout: Duration::from_secs(5),
        ..Default::default()
    })
    .unwrap();
    let target = url("http://127.0.0.1:1/api");

    let held = pool.lease(&target).await.unwrap();
    let held_id = held.id();

    let waiter = {
        let pool = pool.clone();
        let target = target.clone();
        tokio::spawn(async move { pool.lease(&target).await.map(|lease| lease.id()) })
    };

    tokio::time::sleep(Duration::from_millis(100)).await;
    held.release(true);

    assert_eq!(waiter.await.unwrap().unwrap(), held_id);
}

#[tokio::test(start_paused = true)]
async fn test_total_cap_closes_idle_of_other_route() {
    let pool = small_pool(2, 2);
    let a = url("http://127.0.0.1:1/a");
    let b = url("http://127.0.0.2:1/b");

    let first = pool.lease(&a).await.unwrap();
    let second = pool.lease(&a).await.unwrap();
    first.release(true);
    second.release(true);
    assert_eq!(pool.stats().live, 2);

    let on_b = pool.lease(&b).await.unwrap();
    let stats = pool.stats();
    assert_eq!(stats.live, 2);
    assert_eq!(pool.route_stats(&Route::from_url(&a).unwrap()).live, 1);
    assert_eq!(pool.route_stats(on_b.route()).leased, 1);
}

#[tokio::test(start_paused = true)]
async fn test_total_cap_all_leased_exhausts() {
    let pool = small_pool(2, 2);
    let _a = pool.lease(&url("http://127.0.0.1:1/a")).await.unwrap();
    let _b = pool.lease(&url("http://127.0.0.2:1/b")).await.unwrap();

    let err = pool.lease(&url("http://127.0.0.3:1/c")).await.unwrap_err();
    assert!(err.as_resource_exhausted().is_some());
    assert_eq!(pool.stats().live, 2);
}

#[tokio::test(start_paused = true)]
async fn test_close_expired_and_close_idle() {
    let pool = ConnectionPool::new(PoolConfig {
        idle_timeout: Duration::from_secs(1),
        ..Default::default()
    })
    .unwrap();
    let target = url("http://127.0.0.1:1/api");

    let a = pool.lease(&target).await.unwrap();
    let b = pool.lease(&target).await.unwrap();
    a.release(true);
    assert_eq!(pool.close_expired(), 0);

    tokio::time::advance(Duration::from_secs(2)).await;
    b.release(true);

    assert_eq!(pool.close_expired(), 1);
    assert_eq!(pool.stats().idle, 1);

    tokio::time::advance(Duration::from_millis(500)).await;
    assert_eq!(pool.close_idle(Duration::from_secs(10)), 0);
    assert_eq!(pool.close_idle(Duration::from_millis(100)), 1);
    assert_eq!(pool.stats(), PoolStats::default());
}

#[tokio::test(start_paused = true)]
async fn test_connection_ttl_prevents_reuse() {
    let pool = ConnectionPool::new(PoolConfig {
        connection_ttl: Some(Duration::from_secs(60)),
        idle_timeout: Duration::from_secs(120),
        ..Default::default()
    })
    .unwrap();
    let target = url("http://127.0.0.1:1/api");

    let lease = pool.lease(&target).await.unwrap();
    let old_id = lease.id();
    lease.release(true);

    tokio::time::advance(Duration::from_secs(61)).await;
    let fresh = pool.lease(&target).await.unwrap();
    assert_ne!(fresh.id(), old_id);
    assert_eq!(pool.stats().live, 1);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_fails_leases_and_wakes_waiters() {
    let pool = ConnectionPool::new(PoolConfig {
        max_total: 1,
        max_per_route: 1,
        lease_timeout: Duration::from_secs(30),
        ..Default::default()
    })
    .unwrap();
    let target = url("http://127.0.0.1:1/api");
    let held = pool.lease(&target).await.unwrap();

    let waiter = {
        let pool = pool.clone();
        let target = target.clone();
        tokio::spawn(async move { pool.lease(&target).await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;

    pool.shutdown();
    pool.shutdown();
    assert!(pool.is_closed());

    let err = waiter.await.unwrap().unwrap_err();
    assert!(err.as_cancelled().is_some());

    held.release(true);
    assert_eq!(pool.stats().live, 0);
    assert!(pool.lease(&target).await.unwrap_err().as_cancelled().is_some());
}

#[tokio::test(start_paused = true)]
async fn test_evictor_closes_expired_connections() {
    let pool = ConnectionPool::new(PoolConfig {
        idle_timeout: Duration::from_secs(1),
        ..Default::default()
    })
    .unwrap();
    let evictor = IdleEvictor::start(pool.clone(), Duration::from_secs(3));

    let lease = pool.lease(&url("http://127.0.0.1:1/api")).await.unwrap();
    lease.release(true);
    assert_eq!(pool.stats().idle, 1);

    tokio::time::sleep(Duration::from_secs(4)).await;
    assert_eq!(pool.stats().idle, 0);

    evictor.shutdown().await;
}

#[tokio::test]
async fn test_evictor_shutdown_interrupts_sleep() {
    let pool = small_pool(10, 5);
    let evictor = IdleEvictor::start(pool, Duration::from_secs(3600));
    assert_eq!(evictor.interval(), Duration::from_secs(3600));

    tokio::time::timeout(Duration::from_secs(5), evictor.shutdown())
        .await
        .unwrap();
    assert!(!evictor.is_running());
    evictor.shutdown().await;
}
