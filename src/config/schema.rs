//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a site.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::content::query::QueryArgs;
use crate::routing::RouteOptions;

/// Root configuration for a site.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    /// Site identity and feature switches.
    pub app: AppConfig,

    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Content and cache directories.
    pub paths: PathsConfig,

    /// Content types, in registration order.
    pub content: Vec<ContentTypeConfig>,

    /// Extra routes registered before the catch-all page route.
    pub routes: Vec<RouteConfig>,

    /// Cache stores and the global response cache.
    pub cache: CacheConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Site identity.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Public base URL used for feeds, sitemaps and generated links.
    pub url: String,

    pub title: String,

    pub tagline: String,

    /// Content type whose collection is shown on the home page.
    pub home_alias: String,

    /// Register sitemap routes.
    pub sitemap: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080".to_string(),
            title: "Folio".to_string(),
            tagline: String::new(),
            home_alias: String::new(),
            sitemap: false,
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Filesystem locations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Root of the Markdown content tree.
    pub content_dir: String,

    /// Root directory for file-backed cache stores.
    pub cache_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            content_dir: "content".to_string(),
            cache_dir: "cache".to_string(),
        }
    }
}

/// A content type table: `[[content]]` with a `name` plus options.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ContentTypeConfig {
    pub name: String,

    #[serde(flatten)]
    pub options: ContentTypeOptions,
}

/// Options for registering a content type.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ContentTypeOptions {
    /// Directory under the content root.
    pub path: String,

    /// Public URI prefix; defaults to `path`.
    pub uri: Option<String>,

    /// Register routes for this type.
    pub routing: bool,

    /// Entries are visible to the public.
    pub public: bool,

    /// Type whose entries this type's collection lists; defaults to itself.
    pub collect: Option<String>,

    /// Default collection query.
    pub collection: QueryArgs,

    /// Serve an Atom feed of the collection.
    pub feed: bool,

    /// Include in the sitemap.
    pub sitemap: bool,

    pub date_archives: bool,

    pub time_archives: bool,

    /// Entries of this type are taxonomy terms.
    pub taxonomy: bool,

    /// For taxonomies, the type whose entries are tagged with terms.
    pub term_collect: Option<String>,

    /// Default query for a term's collection.
    pub term_collection: QueryArgs,
}

impl Default for ContentTypeOptions {
    fn default() -> Self {
        Self {
            path: String::new(),
            uri: None,
            routing: true,
            public: true,
            collect: None,
            collection: QueryArgs::default(),
            feed: false,
            sitemap: true,
            date_archives: false,
            time_archives: false,
            taxonomy: false,
            term_collect: None,
            term_collection: QueryArgs::default(),
        }
    }
}

/// A configured route.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RouteConfig {
    /// URI template, e.g. `docs/{section}/{name}`.
    pub uri: String,

    /// Route name; defaults to the URI.
    #[serde(default)]
    pub name: Option<String>,

    /// Controller registry key.
    pub controller: String,

    /// Per-placeholder regex overrides.
    #[serde(default, rename = "where")]
    pub wheres: HashMap<String, String>,
}

impl RouteConfig {
    pub fn options(&self) -> RouteOptions {
        RouteOptions {
            name: self.name.clone(),
            controller: self.controller.clone(),
            wheres: self.wheres.clone(),
        }
    }
}

/// Cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Secret required by the purge routes. Empty disables purging.
    pub purge_key: String,

    /// Lifetime of globally cached responses in seconds (0 = never expires).
    pub expires: u64,

    /// Cache full HTML responses.
    pub global: bool,

    /// Path prefixes never cached globally.
    pub global_exclude: Vec<String>,

    /// Named stores.
    pub stores: Vec<CacheStoreConfig>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            purge_key: String::new(),
            expires: 0,
            global: false,
            global_exclude: Vec::new(),
            stores: vec![CacheStoreConfig {
                name: "global".to_string(),
                driver: default_driver(),
            }],
        }
    }
}

/// A named cache store.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CacheStoreConfig {
    pub name: String,

    /// Driver key (`json` or `memory`).
    #[serde(default = "default_driver")]
    pub driver: String,
}

fn default_driver() -> String {
    "json".to_string()
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
