//! HTTP interception subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound connection
//!     → server.rs (Axum setup, request ID, tracing)
//!     → event.rs (request descriptor + reply slot)
//!     → [routing engine picks a handler]
//!     → responder.rs (normalize outcome, contain failures)
//!     → reply awaited and sent, or pass-through upstream fetch
//! ```

pub mod event;
pub mod request;
pub mod responder;
pub mod server;

pub use event::{FetchEvent, FetchRequest, FetchResponse, InterceptionReply};
pub use request::{request_id_layer, UuidRequestId, X_REQUEST_ID};
pub use responder::{respond, Handler, HandlerError, HandlerFn, HandlerOutcome, ResponseFuture};
pub use server::HttpServer;
