//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! folio.toml
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → SiteConfig (validated, immutable)
//!     → Site::build (types, routes, controllers, cache)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads and validates
//!     → server rebuilds the Site
//!     → atomic swap of Arc<Site>
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{ContentTypeConfig, ContentTypeOptions, RouteConfig, SiteConfig};
pub use validation::ValidationError;
pub use watcher::ConfigWatcher;
