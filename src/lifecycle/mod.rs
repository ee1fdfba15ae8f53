//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Load config → install (purge well-known cache, skip waiting)
//!     → activate → serve requests indefinitely
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C or trigger → broadcast → stop accepting → drain → exit
//!
//! A newer installation supersedes this worker: Activated → Redundant.
//! ```
//!
//! # Design Decisions
//! - Install purges rather than migrates; cache entries are disposable
//! - The waiting phase is always skipped so a new version takes control
//!   without waiting for open sessions to close

pub mod shutdown;
pub mod worker;

pub use shutdown::Shutdown;
pub use worker::{WorkerLifecycle, WorkerPhase, WORKER_VERSION};
