//! Worker install/activate lifecycle.
//!
//! # Responsibilities
//! - Purge the well-known cache namespace on install
//! - Skip the waiting phase so a new worker takes control immediately
//! - Track which phase the worker is in

use std::sync::Arc;

use crate::cache::store::CacheStorage;

/// Version marker for the running worker build. Bumping it and
/// reinstalling purges every cached response.
pub const WORKER_VERSION: &str = "001";

/// Lifecycle phases of the interception worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerPhase {
    /// Install hooks are running; requests are not yet intercepted.
    Installing,
    /// The worker controls request interception.
    Activated,
    /// Superseded by a newer installation.
    Redundant,
}

/// Install/activate state machine around the well-known cache namespace.
pub struct WorkerLifecycle {
    cache_name: String,
    phase: WorkerPhase,
}

impl WorkerLifecycle {
    pub fn new(cache_name: impl Into<String>) -> Self {
        Self {
            cache_name: cache_name.into(),
            phase: WorkerPhase::Installing,
        }
    }

    /// Install hook: purge the cache left behind by any previous version,
    /// then skip the waiting phase. A failed purge never blocks install.
    pub async fn install(&mut self, storage: &Arc<dyn CacheStorage>) {
        match storage.delete(&self.cache_name).await {
            Ok(true) => tracing::info!(
                cache = %self.cache_name,
                version = WORKER_VERSION,
                "Purged stale cache"
            ),
            Ok(false) => tracing::debug!(cache = %self.cache_name, "No stale cache to purge"),
            Err(e) => tracing::warn!(
                error = %e,
                cache = %self.cache_name,
                "Cache purge failed"
            ),
        }

        self.skip_waiting();
        tracing::info!(version = WORKER_VERSION, "Worker installed");
    }

    /// Activate hook. Install already performed all cleanup; this only
    /// marks the occasion.
    pub fn activate(&self) {
        tracing::info!("Worker activated");
    }

    /// Take control without waiting for open sessions to drain.
    fn skip_waiting(&mut self) {
        self.phase = WorkerPhase::Activated;
    }

    /// Mark this worker as superseded by a newer installation.
    pub fn retire(&mut self) {
        self.phase = WorkerPhase::Redundant;
    }

    pub fn phase(&self) -> WorkerPhase {
        self.phase
    }

    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }
}
