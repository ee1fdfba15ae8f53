//! Caching HTTP Gateway (v1)
//!
//! An edge gateway built with Tokio and Axum that answers asset requests
//! from a named response cache before reaching for the upstream.
//!
//! ```text
//!     Client ──▶ http server ──▶ routing (ordered rules) ──▶ responder
//!                                                              │
//!                               cache hit ◀── cache strategy ◀─┘
//!                                                │ miss
//!                                                ▼
//!                                          net fetcher ──▶ Upstream
//!                                                │ 2xx
//!                                                ▼
//!                                     cache store (refresh, detached)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use cache_gateway::cache::memory::MemoryStorage;
use cache_gateway::cache::store::CacheStorage;
use cache_gateway::config::{load_config, GatewayConfig};
use cache_gateway::http::HttpServer;
use cache_gateway::lifecycle::{Shutdown, WorkerLifecycle};
use cache_gateway::net::fetcher::HttpFetcher;
use cache_gateway::observability;

#[derive(Parser)]
#[command(name = "cache-gateway")]
#[command(about = "Caching HTTP gateway", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    observability::logging::init();

    let args = Args::parse();

    tracing::info!("cache-gateway v0.1.0 starting");

    let config = match args.config {
        Some(path) => load_config(&path)?,
        None => GatewayConfig::default(),
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_connections = config.listener.max_connections,
        upstream_origin = %config.upstream.origin,
        cache_name = %config.cache.name,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let storage: Arc<dyn CacheStorage> = Arc::new(MemoryStorage::new());
    let fetcher = Arc::new(HttpFetcher::new(config.upstream.max_body_bytes));

    // Purge stale cache entries from previous worker versions, then take
    // control immediately.
    let mut lifecycle = WorkerLifecycle::new(config.cache.name.clone());
    lifecycle.install(&storage).await;
    lifecycle.activate();

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    shutdown.spawn_signal_listener();

    let server = HttpServer::new(config, storage, fetcher)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
