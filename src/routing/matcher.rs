//! Route pattern testing.
//!
//! # Responsibilities
//! - Test a normalized request path against one route's compiled pattern
//! - Return captured placeholder values in template order
//!
//! # Design Decisions
//! - Broken patterns are a non-match, never an error
//! - Kept behind a trait so the router can be driven by a test double

use crate::routing::route::Route;

/// Tests request paths against route patterns.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Captured values if `path` matches `route`.
    fn captures(&self, route: &Route, path: &str) -> Option<Vec<String>>;
}

/// Matches with the route's compiled regex.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexMatcher;

impl Matcher for RegexMatcher {
    fn captures(&self, route: &Route, path: &str) -> Option<Vec<String>> {
        if route.pattern().is_broken() {
            tracing::debug!(route = %route.uri(), "Skipping route with broken pattern");
            return None;
        }
        route.pattern().captures(path)
    }
}
