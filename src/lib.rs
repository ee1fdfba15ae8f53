//! Caching HTTP Gateway Library

pub mod cache;
pub mod config;
pub mod http;
pub mod net;
pub mod routing;
pub mod lifecycle;
pub mod observability;

pub use cache::memory::MemoryStorage;
pub use cache::strategy::CacheFirst;
pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
