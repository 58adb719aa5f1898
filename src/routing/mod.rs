//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → router.rs (normalize, exact / group / scan tiers)
//!     → matcher.rs (test compiled patterns)
//!     → Return: RouteMatch { route, params } or None
//!
//! Route Compilation (at startup):
//!     content types + global routes + configured routes
//!     → routes.rs (ordered table, name index, groups)
//!     → pattern.rs (template → anchored regex, placeholder names)
//!     → Freeze as immutable Router
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Deterministic: same input always matches same route
//! - First match wins (registration order)

pub mod matcher;
pub mod pattern;
pub mod route;
pub mod router;
pub mod routes;
pub mod url;

pub use matcher::{Matcher, RegexMatcher};
pub use pattern::{PatternError, WherePreset};
pub use route::{Route, RouteOptions};
pub use router::{normalize_path, MatchTier, Params, RouteMatch, Router};
pub use routes::{RouteGroup, RouteTable};
pub use url::UrlBuilder;
