//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

use cache_gateway::cache::store::CacheStorage;
use cache_gateway::config::GatewayConfig;
use cache_gateway::http::HttpServer;
use cache_gateway::lifecycle::Shutdown;
use cache_gateway::net::fetcher::HttpFetcher;

/// Start a simple mock upstream that returns a fixed 200 response.
/// Returns the address it is listening on.
#[allow(dead_code)]
pub async fn start_mock_upstream(response: &'static str) -> SocketAddr {
    start_programmable_upstream(move || async move { (200, response.to_string()) }).await
}

/// Start a programmable mock upstream with async support.
/// Returns the address it is listening on.
pub async fn start_programmable_upstream<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let (status, body) = f().await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a gateway in the background against the given storage.
/// Returns the bound address and the shutdown handle.
pub async fn start_gateway(
    mut config: GatewayConfig,
    storage: Arc<dyn CacheStorage>,
) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.bind_address = addr.to_string();

    let fetcher = Arc::new(HttpFetcher::new(config.upstream.max_body_bytes));
    let server = HttpServer::new(config, storage, fetcher).unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    // Let the server start accepting.
    tokio::time::sleep(Duration::from_millis(100)).await;

    (addr, shutdown)
}

/// Non-pooled client so every request opens a fresh connection.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
