//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, status, source
//! - `gateway_request_duration_seconds` (histogram): latency distribution
//! - `gateway_cache_hits_total` / `gateway_cache_misses_total` (counters)
//! - `gateway_cache_write_failures_total` (counter): swallowed refresh
//!   failures
//!
//! # Design Decisions
//! - Low-overhead updates (atomic operations under the hood)
//! - The `source` label distinguishes intercepted from pass-through traffic

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and exposition endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, address = %addr, "Failed to install metrics exporter"),
    }
}

/// Record one completed request.
pub fn record_request(method: &str, status: u16, source: &str, start: Instant) {
    counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "source" => source.to_string()
    )
    .increment(1);
    histogram!(
        "gateway_request_duration_seconds",
        "method" => method.to_string(),
        "source" => source.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_cache_hit(cache: &str) {
    counter!("gateway_cache_hits_total", "cache" => cache.to_string()).increment(1);
}

pub fn record_cache_miss(cache: &str) {
    counter!("gateway_cache_misses_total", "cache" => cache.to_string()).increment(1);
}

pub fn record_cache_write_failure(cache: &str) {
    counter!("gateway_cache_write_failures_total", "cache" => cache.to_string()).increment(1);
}
