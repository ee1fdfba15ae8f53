//! Route rule evaluation.
//!
//! # Responsibilities
//! - Match exact URLs, resolved against the gateway location
//! - Match URL patterns, excluding the worker script itself
//! - Delegate to caller-supplied predicates
//!
//! # Design Decisions
//! - Rules are a closed tagged union with one evaluation arm per variant;
//!   there is no runtime inspection of arbitrary values
//! - An exact rule that fails to resolve is a non-match, never an error
//! - Pattern rules test the full URL string, query and fragment included

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use url::Url;

use crate::http::event::FetchRequest;

/// Filename of the interception worker script. Pattern rules never match a
/// request for the script itself.
pub const WORKER_SCRIPT: &str = "sw.js";

/// Custom matching function for [`Rule::Predicate`].
pub type RulePredicate = Arc<dyn Fn(&FetchRequest) -> bool + Send + Sync>;

/// A registration rule for intercepted requests.
#[derive(Clone)]
pub enum Rule {
    /// Match a single URL. Relative rule strings resolve against the
    /// gateway location before comparison.
    Exact(String),
    /// Match request URLs against a regular expression.
    Pattern(Regex),
    /// Delegate the decision to the supplied predicate.
    Predicate(RulePredicate),
}

impl Rule {
    /// Convenience constructor for predicate rules.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&FetchRequest) -> bool + Send + Sync + 'static,
    {
        Rule::Predicate(Arc::new(f))
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Exact(url) => f.debug_tuple("Exact").field(url).finish(),
            Rule::Pattern(pattern) => f.debug_tuple("Pattern").field(&pattern.as_str()).finish(),
            Rule::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Returns true if the request satisfies the rule.
///
/// `location` is the origin the gateway serves; exact rules resolve against
/// it the way relative URLs resolve in a page.
pub fn matches(rule: &Rule, request: &FetchRequest, location: &Url) -> bool {
    match rule {
        Rule::Exact(target) => location
            .join(target)
            .map(|absolute| absolute.as_str() == request.url().as_str())
            .unwrap_or(false),
        Rule::Pattern(pattern) => {
            pattern.is_match(request.url().as_str())
                && !request.url().as_str().ends_with(WORKER_SCRIPT)
        }
        Rule::Predicate(predicate) => predicate(request),
    }
}
