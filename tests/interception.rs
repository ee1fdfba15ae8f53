//! Routing and pass-through tests for the gateway.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cache_gateway::cache::memory::MemoryStorage;
use cache_gateway::cache::store::CacheStorage;
use cache_gateway::config::GatewayConfig;

mod common;

fn config_for(upstream: std::net::SocketAddr) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.upstream.origin = format!("http://{}", upstream);
    config.observability.metrics_enabled = false;
    config
}

async fn counting_upstream(body: &'static str) -> (std::net::SocketAddr, Arc<AtomicU32>) {
    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();
    let addr = common::start_programmable_upstream(move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            (200, body.to_string())
        }
    })
    .await;
    (addr, hits)
}

#[tokio::test]
async fn test_index_route_is_cached() {
    let (upstream, hits) = counting_upstream("<html>home</html>").await;
    let storage: Arc<dyn CacheStorage> = Arc::new(MemoryStorage::new());
    let (addr, shutdown) = common::start_gateway(config_for(upstream), storage).await;
    let client = common::client();

    let first = client.get(format!("http://{}/", addr)).send().await.unwrap();
    assert_eq!(first.status(), 200);
    assert_eq!(first.text().await.unwrap(), "<html>home</html>");

    tokio::time::sleep(Duration::from_millis(300)).await;

    let second = client.get(format!("http://{}/", addr)).send().await.unwrap();
    assert_eq!(second.text().await.unwrap(), "<html>home</html>");

    assert_eq!(hits.load(Ordering::SeqCst), 1);

    shutdown.trigger();
}

#[tokio::test]
async fn test_worker_script_is_never_intercepted() {
    let (upstream, hits) = counting_upstream("worker-source").await;
    let storage: Arc<dyn CacheStorage> = Arc::new(MemoryStorage::new());
    let (addr, shutdown) = common::start_gateway(config_for(upstream), storage).await;
    let client = common::client();

    // `/sw.js` matches the script pattern by extension, but the
    // self-exclusion guard keeps it out of the cache path.
    for _ in 0..2 {
        let response = client
            .get(format!("http://{}/sw.js", addr))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        tokio::time::sleep(Duration::from_millis(150)).await;
    }

    assert_eq!(hits.load(Ordering::SeqCst), 2);

    shutdown.trigger();
}

#[tokio::test]
async fn test_unmatched_requests_pass_through() {
    let (upstream, hits) = counting_upstream("{\"data\":1}").await;
    let storage: Arc<dyn CacheStorage> = Arc::new(MemoryStorage::new());
    let (addr, shutdown) = common::start_gateway(config_for(upstream), storage).await;
    let client = common::client();

    for _ in 0..2 {
        let response = client
            .get(format!("http://{}/api/data", addr))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        tokio::time::sleep(Duration::from_millis(150)).await;
    }

    assert_eq!(
        hits.load(Ordering::SeqCst),
        2,
        "pass-through traffic is never cached"
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_upstream_failure_modes() {
    // Nothing listens on the upstream address: bind a socket to reserve a
    // port, then drop it.
    let reserved = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let upstream = reserved.local_addr().unwrap();
    drop(reserved);

    let storage: Arc<dyn CacheStorage> = Arc::new(MemoryStorage::new());
    let (addr, shutdown) = common::start_gateway(config_for(upstream), storage).await;
    let client = common::client();

    // Matched route: the strategy's fetch fails inside the pending
    // computation, which surfaces as a synthetic 500.
    let intercepted = client
        .get(format!("http://{}/app.js", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(intercepted.status(), 500);
    let body = intercepted.text().await.unwrap();
    assert!(body.contains("gateway handler failure"));

    // Unmatched route: the pass-through fetch fails at the gateway edge,
    // which is a plain 502.
    let passthrough = client
        .get(format!("http://{}/api/data", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(passthrough.status(), 502);

    shutdown.trigger();
}
