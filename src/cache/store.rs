//! Cache store contracts.
//!
//! The response store is an external service from the gateway's point of
//! view: a directory of named caches, each a key-value table of URL →
//! response snapshot. Put and lookup are atomic per entry; the store's own
//! consistency guarantees serialize concurrent readers and writers.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::http::event::FetchResponse;

/// Failure of the underlying store.
///
/// Callers absorb these locally: caching is an optimization, never a
/// correctness requirement, so a store failure must not break delivery.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache store unavailable: {0}")]
    Unavailable(String),

    #[error("cache io: {0}")]
    Io(#[from] std::io::Error),
}

/// Lookup semantics, mirroring the platform's cache query options.
///
/// Advisory for stores whose keys are plain strings; query-insensitivity is
/// already a property of key derivation.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchOptions {
    pub ignore_method: bool,
    pub ignore_vary: bool,
}

/// One named namespace of URL-keyed response snapshots.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Store a snapshot under the key, replacing any previous entry.
    async fn put(&self, key: &str, response: FetchResponse) -> Result<(), CacheError>;

    /// Look up a previously stored snapshot.
    async fn lookup(
        &self,
        key: &str,
        options: &MatchOptions,
    ) -> Result<Option<FetchResponse>, CacheError>;
}

/// Directory of named caches.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Open the named cache, creating it if needed.
    async fn open(&self, name: &str) -> Result<Arc<dyn Cache>, CacheError>;

    /// Drop the named cache and all its entries. Returns whether it existed.
    async fn delete(&self, name: &str) -> Result<bool, CacheError>;
}
