//! In-process cache store.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::cache::store::{Cache, CacheError, CacheStorage, MatchOptions};
use crate::http::event::FetchResponse;

/// A cache namespace held in process memory.
#[derive(Default)]
pub struct MemoryCache {
    entries: DashMap<String, FetchResponse>,
}

impl MemoryCache {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn put(&self, key: &str, response: FetchResponse) -> Result<(), CacheError> {
        self.entries.insert(key.to_string(), response);
        Ok(())
    }

    async fn lookup(
        &self,
        key: &str,
        _options: &MatchOptions,
    ) -> Result<Option<FetchResponse>, CacheError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }
}

/// DashMap-backed storage: namespaces are created on first open and shared
/// between every handle opened under the same name.
#[derive(Default)]
pub struct MemoryStorage {
    namespaces: DashMap<String, Arc<MemoryCache>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently held under the named cache.
    pub fn entry_count(&self, name: &str) -> usize {
        self.namespaces
            .get(name)
            .map(|cache| cache.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl CacheStorage for MemoryStorage {
    async fn open(&self, name: &str) -> Result<Arc<dyn Cache>, CacheError> {
        let cache = self
            .namespaces
            .entry(name.to_string())
            .or_default()
            .clone();
        Ok(cache)
    }

    async fn delete(&self, name: &str) -> Result<bool, CacheError> {
        Ok(self.namespaces.remove(name).is_some())
    }
}
