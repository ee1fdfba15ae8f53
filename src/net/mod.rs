//! Outbound networking subsystem.
//!
//! # Data Flow
//! ```text
//! Cache miss or pass-through request
//!     → fetcher.rs (rebuild request, send via pooled hyper client)
//!     → buffer body to a response snapshot
//!     → back to the strategy (cacheable) or straight to the client
//! ```

pub mod fetcher;

pub use fetcher::{FetchError, FetchOptions, Fetcher, HttpFetcher};
