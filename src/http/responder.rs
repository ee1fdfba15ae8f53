//! Handler outcome adaptation.
//!
//! # Responsibilities
//! - Invoke a route handler for an intercepted request
//! - Normalize its outcome into at most one reply registration
//! - Contain asynchronous failures as a synthetic 500 response
//!
//! # Design Decisions
//! - A synchronous handler failure is swallowed and the request falls
//!   through to default upstream handling; only a pending computation's
//!   failure surfaces to the client, and then only as a generic 500

use axum::http::{HeaderValue, StatusCode};
use bytes::Bytes;
use futures_util::future::BoxFuture;
use thiserror::Error;

use crate::http::event::{FetchEvent, FetchRequest, FetchResponse, InterceptionReply};
use crate::net::fetcher::FetchError;

/// Future returned by asynchronous handlers.
pub type ResponseFuture = BoxFuture<'static, Result<FetchResponse, HandlerError>>;

/// Failure modes of a route handler.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The asynchronous computation resolved to something that is not a
    /// response.
    #[error("handler resolved to a non-response value: {0}")]
    InvalidResponse(String),

    /// The network fetch behind the handler failed outright.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Any other handler failure.
    #[error("handler failed: {0}")]
    Other(String),
}

/// What a handler produced for an intercepted request.
pub enum HandlerOutcome {
    /// A response available immediately.
    Response(FetchResponse),
    /// A computation that will yield a response, or fail, later.
    Pending(ResponseFuture),
    /// No interception; let the request continue through default handling.
    PassThrough,
}

/// A route handler: maps a request descriptor to an outcome.
///
/// Handlers are stateless apart from whatever they close over (typically a
/// cache namespace and service handles).
pub trait Handler: Send + Sync {
    fn handle(&self, request: &FetchRequest) -> Result<HandlerOutcome, HandlerError>;
}

/// Adapter turning a plain function into a [`Handler`].
pub struct HandlerFn<F>(pub F);

impl<F> Handler for HandlerFn<F>
where
    F: Fn(&FetchRequest) -> Result<HandlerOutcome, HandlerError> + Send + Sync,
{
    fn handle(&self, request: &FetchRequest) -> Result<HandlerOutcome, HandlerError> {
        (self.0)(request)
    }
}

/// Adapt the handler's result into the event's reply slot.
///
/// Registers exactly one reply, or none when the handler opts out or fails
/// synchronously.
pub fn respond(event: &mut FetchEvent, handler: &dyn Handler) {
    let outcome = match handler.handle(event.request()) {
        Ok(outcome) => outcome,
        Err(e) => {
            // Swallowed on purpose: the request falls through to default
            // upstream handling instead of receiving an error response.
            tracing::debug!(
                error = %e,
                url = %event.request().url(),
                "Handler failed synchronously, falling through"
            );
            return;
        }
    };

    match outcome {
        HandlerOutcome::Response(response) => {
            event.respond_with(InterceptionReply::Immediate(response));
        }
        HandlerOutcome::Pending(future) => {
            let url = event.request().url().clone();
            // Registered immediately; the continuation resolves later and
            // maps any failure to a synthetic error response.
            let adapted: BoxFuture<'static, FetchResponse> = Box::pin(async move {
                match future.await {
                    Ok(response) => response,
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            url = %url,
                            "Asynchronous handler failed, substituting error response"
                        );
                        error_response(&e)
                    }
                }
            });
            event.respond_with(InterceptionReply::Pending(adapted));
        }
        HandlerOutcome::PassThrough => {}
    }
}

/// Synthetic response substituted when an asynchronous handler breaks its
/// contract.
pub fn error_response(err: &HandlerError) -> FetchResponse {
    let body = serde_json::json!({
        "error": "gateway handler failure",
        "detail": err.to_string(),
    });
    FetchResponse::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        Bytes::from(body.to_string()),
    )
    .with_content_type(HeaderValue::from_static("application/json"))
}
