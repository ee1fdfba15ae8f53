//! Cache-first resolution strategy.
//!
//! # Responsibilities
//! - Derive the cache key from the request URL
//! - Answer from the named cache when possible, with no freshness check
//! - Fetch from the network on a miss and refresh the cache on success
//!
//! # Design Decisions
//! - Read failures count as misses and write failures are swallowed; the
//!   cache subsystem must never block delivery
//! - Unsuccessful fetches are returned as-is and never cached, so a bad
//!   response cannot shadow the upstream
//! - The refresh write runs in a detached task, concurrent with delivery;
//!   a near-simultaneous second request for the same key may still miss

use std::sync::Arc;

use crate::cache::store::{CacheStorage, MatchOptions};
use crate::http::event::{FetchRequest, FetchResponse};
use crate::http::responder::{Handler, HandlerError, HandlerOutcome};
use crate::net::fetcher::{FetchOptions, Fetcher};
use crate::observability::metrics;

/// Strip everything from the first `#` or `?` so query and fragment
/// variants of a URL share one cache entry.
pub fn cache_key(url: &str) -> &str {
    match url.find(['#', '?']) {
        Some(index) => &url[..index],
        None => url,
    }
}

/// Handler resolving requests cache-first against a named cache, falling
/// back to the network and refreshing the cache from successful responses.
#[derive(Clone)]
pub struct CacheFirst {
    cache_name: String,
    storage: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
    match_options: MatchOptions,
    fetch_options: FetchOptions,
}

impl CacheFirst {
    pub fn new(
        cache_name: impl Into<String>,
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        Self {
            cache_name: cache_name.into(),
            storage,
            fetcher,
            match_options: MatchOptions::default(),
            fetch_options: FetchOptions::default(),
        }
    }

    pub fn with_match_options(mut self, options: MatchOptions) -> Self {
        self.match_options = options;
        self
    }

    pub fn with_fetch_options(mut self, options: FetchOptions) -> Self {
        self.fetch_options = options;
        self
    }

    async fn resolve(self, request: FetchRequest) -> Result<FetchResponse, HandlerError> {
        let key = cache_key(request.url().as_str()).to_string();

        if let Some(hit) = self.cached_response(&key).await {
            tracing::debug!(key = %key, cache = %self.cache_name, "Cache hit");
            metrics::record_cache_hit(&self.cache_name);
            return Ok(hit);
        }

        metrics::record_cache_miss(&self.cache_name);
        self.fetch_and_cache(request, key).await
    }

    /// Read the cache for the key. Any store failure counts as a miss.
    async fn cached_response(&self, key: &str) -> Option<FetchResponse> {
        let cache = match self.storage.open(&self.cache_name).await {
            Ok(cache) => cache,
            Err(e) => {
                tracing::debug!(
                    error = %e,
                    cache = %self.cache_name,
                    "Cache open failed, treating as miss"
                );
                return None;
            }
        };

        match cache.lookup(key, &self.match_options).await {
            Ok(hit) => hit,
            Err(e) => {
                tracing::debug!(error = %e, key = %key, "Cache lookup failed, treating as miss");
                None
            }
        }
    }

    async fn fetch_and_cache(
        &self,
        request: FetchRequest,
        key: String,
    ) -> Result<FetchResponse, HandlerError> {
        let response = self
            .fetcher
            .fetch(request.clone(), &self.fetch_options)
            .await?;

        // Unsuccessful responses are never cached.
        if !response.is_ok() {
            return Ok(response);
        }

        let snapshot = response.clone();
        let storage = Arc::clone(&self.storage);
        let cache_name = self.cache_name.clone();

        // The response already belongs to the caller; refresh the cache
        // without blocking delivery.
        tokio::spawn(async move {
            let result = async { storage.open(&cache_name).await?.put(&key, snapshot).await }.await;
            if let Err(e) = result {
                metrics::record_cache_write_failure(&cache_name);
                tracing::debug!(
                    error = %e,
                    key = %key,
                    cache = %cache_name,
                    "Cache refresh failed"
                );
            }
        });

        Ok(response)
    }
}

impl Handler for CacheFirst {
    fn handle(&self, request: &FetchRequest) -> Result<HandlerOutcome, HandlerError> {
        let strategy = self.clone();
        let request = request.clone();
        Ok(HandlerOutcome::Pending(Box::pin(async move {
            strategy.resolve(request).await
        })))
    }
}
