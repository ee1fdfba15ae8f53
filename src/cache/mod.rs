//! Cache subsystem.
//!
//! # Data Flow
//! ```text
//! Request (matched route)
//!     → strategy.rs (derive key, read named cache)
//!     → hit: return snapshot, no network access
//!     → miss: net fetcher → upstream
//!         → 2xx: deliver + detached write-back through store.rs
//!         → other: deliver uncached
//!
//! Store layout:
//!     CacheStorage (directory of namespaces, purged at install)
//!         → Cache (URL key → response snapshot)
//! ```
//!
//! # Design Decisions
//! - Store failures are absorbed where they happen; the network path never
//!   waits on the cache
//! - No eviction, expiry, or freshness logic; entries live until the
//!   namespace is purged at the next install

pub mod memory;
pub mod store;
pub mod strategy;

pub use memory::{MemoryCache, MemoryStorage};
pub use store::{Cache, CacheError, CacheStorage, MatchOptions};
pub use strategy::{cache_key, CacheFirst};
