//! Request, response, and interception event types.
//!
//! # Design Decisions
//! - Requests carry an absolute URL so rule matching and cache keys never
//!   depend on ambient state
//! - Responses are immutable snapshots; the body is `Bytes`, so cloning one
//!   for storage never copies the payload
//! - An event holds a single-occupancy reply slot: one registration or none

use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use bytes::Bytes;
use futures_util::future::BoxFuture;
use url::Url;

/// Descriptor of an intercepted request.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
}

impl FetchRequest {
    /// Create a request descriptor for the given absolute URL.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
        }
    }

    /// Shorthand for a GET request, the common case for asset traffic.
    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

/// An immutable response snapshot.
///
/// Cached entries are clones of delivered responses; `Bytes` makes the clone
/// a reference-count bump rather than a payload copy.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl FetchResponse {
    pub fn new(status: StatusCode, body: Bytes) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body,
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_content_type(mut self, content_type: HeaderValue) -> Self {
        self.headers.insert(header::CONTENT_TYPE, content_type);
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// Successful per the platform's `ok` classification (2xx).
    pub fn is_ok(&self) -> bool {
        self.status.is_success()
    }
}

/// Reply registered on an interception event.
pub enum InterceptionReply {
    /// Response available synchronously.
    Immediate(FetchResponse),
    /// Response still being computed. The future resolves to a response
    /// unconditionally; failure containment happens before registration.
    Pending(BoxFuture<'static, FetchResponse>),
}

/// One intercepted request and its reply slot.
///
/// An empty slot after dispatch means the request proceeds through default
/// upstream handling.
pub struct FetchEvent {
    request: FetchRequest,
    reply: Option<InterceptionReply>,
}

impl FetchEvent {
    pub fn new(request: FetchRequest) -> Self {
        Self {
            request,
            reply: None,
        }
    }

    pub fn request(&self) -> &FetchRequest {
        &self.request
    }

    /// Register the reply for this event.
    ///
    /// Only the first registration counts; a second one is dropped with a
    /// warning so an event never answers twice.
    pub fn respond_with(&mut self, reply: InterceptionReply) {
        if self.reply.is_some() {
            tracing::warn!(
                url = %self.request.url,
                "Reply already registered for event, ignoring"
            );
            return;
        }
        self.reply = Some(reply);
    }

    pub fn has_reply(&self) -> bool {
        self.reply.is_some()
    }

    pub fn into_parts(self) -> (FetchRequest, Option<InterceptionReply>) {
        (self.request, self.reply)
    }
}
