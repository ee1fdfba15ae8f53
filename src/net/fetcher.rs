//! Outbound network fetch.
//!
//! # Responsibilities
//! - Perform the upstream request for cache misses and pass-through traffic
//! - Buffer response bodies into immutable snapshots
//!
//! # Design Decisions
//! - No retries and no timeout: a hung upstream hangs the owning task
//! - Bodies are buffered under a size cap so responses can be cloned into
//!   the cache

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, HeaderMap, Request, Uri};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use thiserror::Error;

use crate::http::event::{FetchRequest, FetchResponse};

/// Failure of an outbound fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid upstream uri: {0}")]
    InvalidUri(#[from] axum::http::uri::InvalidUri),

    #[error("failed to build upstream request: {0}")]
    Request(#[from] axum::http::Error),

    #[error("upstream request failed: {0}")]
    Transport(#[source] hyper_util::client::legacy::Error),

    #[error("failed to read upstream body: {0}")]
    Body(#[source] axum::Error),
}

/// Options applied to outbound fetches.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Extra headers merged into the outbound request.
    pub headers: HeaderMap,
}

/// Network fetch service.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Perform the request and buffer the response.
    async fn fetch(
        &self,
        request: FetchRequest,
        options: &FetchOptions,
    ) -> Result<FetchResponse, FetchError>;
}

/// hyper-based fetcher for live upstream traffic (HTTP/1.1 and HTTP/2).
pub struct HttpFetcher {
    client: Client<HttpConnector, Body>,
    max_body_bytes: usize,
}

impl HttpFetcher {
    pub fn new(max_body_bytes: usize) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self {
            client,
            max_body_bytes,
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(
        &self,
        request: FetchRequest,
        options: &FetchOptions,
    ) -> Result<FetchResponse, FetchError> {
        let uri = Uri::try_from(request.url().as_str())?;

        let mut outbound = Request::builder().method(request.method().clone()).uri(uri);
        if let Some(headers) = outbound.headers_mut() {
            for (name, value) in request.headers() {
                headers.insert(name.clone(), value.clone());
            }
            for (name, value) in options.headers.iter() {
                headers.insert(name.clone(), value.clone());
            }
            // The outbound authority comes from the URI, not from whatever
            // host the client addressed.
            headers.remove(header::HOST);
        }
        let outbound = outbound.body(Body::empty())?;

        let response = self
            .client
            .request(outbound)
            .await
            .map_err(FetchError::Transport)?;

        let (parts, body) = response.into_parts();
        let bytes = axum::body::to_bytes(Body::new(body), self.max_body_bytes)
            .await
            .map_err(FetchError::Body)?;

        let mut headers = parts.headers;
        // Buffering invalidates the upstream's framing; drop hop-by-hop
        // headers so the snapshot can be replayed verbatim.
        headers.remove(header::TRANSFER_ENCODING);
        headers.remove(header::CONNECTION);

        Ok(FetchResponse::new(parts.status, bytes).with_headers(headers))
    }
}
