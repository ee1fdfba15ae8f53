//! HTTP server setup and interception dispatch.
//!
//! # Responsibilities
//! - Create the Axum router with the catch-all interception handler
//! - Wire up middleware (request ID, tracing)
//! - Register the startup route table against the shared cache namespace
//! - Resolve each inbound request through the routing engine
//! - Fall back to a direct upstream fetch when no route claims a request

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use regex::Regex;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use url::Url;

use crate::cache::store::CacheStorage;
use crate::cache::strategy::CacheFirst;
use crate::config::loader::ConfigError;
use crate::config::validation::ValidationError;
use crate::config::GatewayConfig;
use crate::http::event::{FetchEvent, FetchRequest, FetchResponse, InterceptionReply};
use crate::http::request::{request_id_layer, X_REQUEST_ID};
use crate::net::fetcher::{FetchOptions, Fetcher};
use crate::observability::metrics;
use crate::routing::matcher::Rule;
use crate::routing::Router as RuleRouter;

/// Application state injected into the interception handler.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<RuleRouter>,
    pub fetcher: Arc<dyn Fetcher>,
}

/// HTTP server fronting the upstream with the caching route table.
pub struct HttpServer {
    app: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a server with the given configuration and service handles.
    pub fn new(
        config: GatewayConfig,
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Result<Self, ConfigError> {
        let location = config.upstream.origin_url().map_err(|e| {
            ConfigError::Validation(vec![ValidationError::InvalidUpstreamOrigin(
                config.upstream.origin.clone(),
                e.to_string(),
            )])
        })?;

        let mut router = RuleRouter::new(location);
        register_default_routes(&mut router, &config, &storage, &fetcher);

        tracing::info!(
            routes = router.route_count(),
            cache_name = %config.cache.name,
            "Route table registered"
        );

        let state = AppState {
            router: Arc::new(router),
            fetcher,
        };

        let app = Self::build_router(state);
        Ok(Self { app, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(intercept_handler))
            .route("/", any(intercept_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(request_id_layer())
                    .layer(TraceLayer::new_for_http()),
            )
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let app = self.app.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Startup route table: pages, scripts and styles, and images, all resolved
/// cache-first from one shared namespace.
fn register_default_routes(
    router: &mut RuleRouter,
    config: &GatewayConfig,
    storage: &Arc<dyn CacheStorage>,
    fetcher: &Arc<dyn Fetcher>,
) {
    let strategy = Arc::new(CacheFirst::new(
        config.cache.name.clone(),
        Arc::clone(storage),
        Arc::clone(fetcher),
    ));

    router.register_route(
        Rule::predicate(|request| {
            let path = request.url().path();
            path == "/" || path == "/index.html"
        }),
        strategy.clone(),
    );
    router.register_route(
        Rule::Pattern(Regex::new(r"\.(css|js)$").expect("script/style pattern")),
        strategy.clone(),
    );
    router.register_route(
        Rule::Pattern(Regex::new(r"\.(jpe?g|png|svg|ico)$").expect("image pattern")),
        strategy,
    );
}

/// Interception entry point, invoked once per inbound request.
async fn intercept_handler(
    State(state): State<AppState>,
    ConnectInfo(_addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    let start = Instant::now();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let method = request.method().clone();
    let method_str = method.to_string();

    // Absolute URL resolved against the gateway location, for rule matching
    // and cache keys.
    let url = match resolve_url(state.router.location(), request.uri()) {
        Some(url) => url,
        None => {
            tracing::warn!(request_id = %request_id, uri = %request.uri(), "Unresolvable request URI");
            metrics::record_request(&method_str, 400, "rejected", start);
            return (StatusCode::BAD_REQUEST, "Unresolvable request URI").into_response();
        }
    };

    let fetch_request =
        FetchRequest::new(method, url).with_headers(request.headers().clone());

    tracing::debug!(
        request_id = %request_id,
        method = %method_str,
        url = %fetch_request.url(),
        "Intercepted request"
    );

    let mut event = FetchEvent::new(fetch_request);
    state.router.dispatch(&mut event);
    let (fetch_request, reply) = event.into_parts();

    match reply {
        Some(InterceptionReply::Immediate(response)) => {
            metrics::record_request(&method_str, response.status().as_u16(), "intercepted", start);
            into_axum_response(response)
        }
        Some(InterceptionReply::Pending(future)) => {
            let response = future.await;
            metrics::record_request(&method_str, response.status().as_u16(), "intercepted", start);
            into_axum_response(response)
        }
        // No route claimed the request; default upstream handling.
        None => match state.fetcher.fetch(fetch_request, &FetchOptions::default()).await {
            Ok(response) => {
                metrics::record_request(&method_str, response.status().as_u16(), "passthrough", start);
                into_axum_response(response)
            }
            Err(e) => {
                tracing::error!(request_id = %request_id, error = %e, "Upstream error");
                metrics::record_request(&method_str, 502, "passthrough", start);
                (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
            }
        },
    }
}

/// Resolve the inbound URI against the gateway location.
fn resolve_url(location: &Url, uri: &Uri) -> Option<Url> {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    location.join(target).ok()
}

fn into_axum_response(response: FetchResponse) -> Response {
    let mut builder = Response::builder().status(response.status());
    if let Some(headers) = builder.headers_mut() {
        for (name, value) in response.headers() {
            headers.insert(name.clone(), value.clone());
        }
    }
    builder
        .body(Body::from(response.into_body()))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

/// Wait for the shutdown broadcast.
async fn shutdown_signal(mut shutdown: broadcast::Receiver<()>) {
    let _ = shutdown.recv().await;
    tracing::info!("Shutdown signal received");
}
