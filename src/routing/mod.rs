//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Intercepted request (method, absolute URL, headers)
//!     → router.rs (walk routes in registration order)
//!     → matcher.rs (evaluate the route's rule)
//!     → first match: responder adapts the handler's outcome
//!     → no match: event left untouched, default handling applies
//! ```
//!
//! # Design Decisions
//! - Routes are registered once at startup and never removed
//! - Registration order is the only priority mechanism
//! - Rule shapes are a closed tagged union (exact / pattern / predicate)

pub mod matcher;
pub mod router;

pub use matcher::{matches, Rule, RulePredicate, WORKER_SCRIPT};
pub use router::{Route, Router};
