//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for the whole process
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the built-in default filter
//! - Structured fields (request_id, cache, url) over message interpolation

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber. Call once, before anything
/// logs.
pub fn init() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cache_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
