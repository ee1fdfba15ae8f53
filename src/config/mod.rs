//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, all errors reported)
//!     → GatewayConfig (validated, immutable)
//!     → shared with subsystems at startup
//!
//! env.rs resolves the surrounding service's endpoints from the current
//! origin; the gateway core does not consume it.
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the route table is fixed at startup
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod env;
pub mod loader;
pub mod schema;
pub mod validation;

pub use env::{resolve_env, ServiceEnv, SERVICE_VERSION};
pub use loader::{load_config, ConfigError};
pub use schema::{
    CacheConfig, GatewayConfig, ListenerConfig, ObservabilityConfig, UpstreamConfig,
};
pub use validation::{validate_config, ValidationError};
