//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store registered routes in order
//! - Find the first matching route for an intercepted request
//! - Delegate the event to that route's handler, exactly once
//!
//! # Design Decisions
//! - Registration order is match priority; first match wins, later rules
//!   are never evaluated
//! - The table stays a plain ordered list; a keyed structure would lose the
//!   priority semantics
//! - No duplicate detection or rule validation at registration time

use std::sync::Arc;

use url::Url;

use crate::http::event::{FetchEvent, FetchRequest};
use crate::http::responder::{self, Handler};
use crate::routing::matcher::{self, Rule};

/// A registered (rule, handler) pair. Immutable once registered.
pub struct Route {
    pub rule: Rule,
    pub handler: Arc<dyn Handler>,
}

/// Ordered route table for intercepted requests.
pub struct Router {
    routes: Vec<Route>,
    location: Url,
}

impl Router {
    /// Create an empty router serving the given location.
    pub fn new(location: Url) -> Self {
        Self {
            routes: Vec::new(),
            location,
        }
    }

    /// Append a route. Registration order determines match priority.
    pub fn register_route(&mut self, rule: Rule, handler: Arc<dyn Handler>) {
        self.routes.push(Route { rule, handler });
    }

    pub fn location(&self) -> &Url {
        &self.location
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Find the first route whose rule matches the request.
    pub fn match_request(&self, request: &FetchRequest) -> Option<&Route> {
        self.routes
            .iter()
            .find(|route| matcher::matches(&route.rule, request, &self.location))
    }

    /// Interception entry point, invoked once per intercepted request.
    ///
    /// Dispatches the event to the first matching route's handler and stops.
    /// Returns whether any route matched; an unmatched event is left
    /// untouched so the request proceeds through default handling.
    pub fn dispatch(&self, event: &mut FetchEvent) -> bool {
        for route in &self.routes {
            if matcher::matches(&route.rule, event.request(), &self.location) {
                responder::respond(event, route.handler.as_ref());
                return true;
            }
        }
        false
    }
}
