//! Cache resolution tests for the gateway.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cache_gateway::cache::memory::MemoryStorage;
use cache_gateway::cache::store::CacheStorage;
use cache_gateway::config::GatewayConfig;
use cache_gateway::lifecycle::WorkerLifecycle;

mod common;

fn config_for(upstream: std::net::SocketAddr) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.upstream.origin = format!("http://{}", upstream);
    config.observability.metrics_enabled = false;
    config
}

#[tokio::test]
async fn test_second_request_is_served_from_cache() {
    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();
    let upstream = common::start_programmable_upstream(move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            (200, "asset-body".to_string())
        }
    })
    .await;

    let storage: Arc<dyn CacheStorage> = Arc::new(MemoryStorage::new());
    let (addr, shutdown) = common::start_gateway(config_for(upstream), storage).await;
    let client = common::client();

    let first = client
        .get(format!("http://{}/app.js", addr))
        .send()
        .await
        .expect("gateway unreachable");
    assert_eq!(first.status(), 200);
    assert_eq!(first.text().await.unwrap(), "asset-body");

    // Give the detached cache refresh time to land.
    tokio::time::sleep(Duration::from_millis(300)).await;

    let second = client
        .get(format!("http://{}/app.js", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), 200);
    assert_eq!(second.text().await.unwrap(), "asset-body");

    assert_eq!(
        hits.load(Ordering::SeqCst),
        1,
        "second request must not reach the upstream"
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_unsuccessful_response_is_never_cached() {
    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();
    let upstream = common::start_programmable_upstream(move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            (404, "nope".to_string())
        }
    })
    .await;

    let storage: Arc<dyn CacheStorage> = Arc::new(MemoryStorage::new());
    let (addr, shutdown) = common::start_gateway(config_for(upstream), storage).await;
    let client = common::client();

    for _ in 0..2 {
        let response = client
            .get(format!("http://{}/missing.js", addr))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 404);
        tokio::time::sleep(Duration::from_millis(150)).await;
    }

    assert_eq!(
        hits.load(Ordering::SeqCst),
        2,
        "a 404 must not produce a cache entry"
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_install_purges_cached_responses() {
    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();
    let upstream = common::start_programmable_upstream(move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            (200, "styles".to_string())
        }
    })
    .await;

    let config = config_for(upstream);
    let cache_name = config.cache.name.clone();
    let storage: Arc<dyn CacheStorage> = Arc::new(MemoryStorage::new());
    let (addr, shutdown) = common::start_gateway(config, storage.clone()).await;
    let client = common::client();

    client
        .get(format!("http://{}/site.css", addr))
        .send()
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;

    client
        .get(format!("http://{}/site.css", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    // A new worker version installs: the namespace is purged and the next
    // request goes back to the upstream.
    let mut lifecycle = WorkerLifecycle::new(cache_name);
    lifecycle.install(&storage).await;

    client
        .get(format!("http://{}/site.css", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 2);

    shutdown.trigger();
}
