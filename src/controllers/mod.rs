//! Controllers: turn a matched route into a response.
//!
//! # Responsibilities
//! - Define the `Controller` interface every route target implements
//! - Register the built-in controllers under their string keys
//! - Share the query and rendering helpers controllers have in common
//!
//! # Data Flow
//! ```text
//! Router match (route.controller key, Params)
//!     → ControllerRegistry::get(key)
//!     → Controller::handle(params, site)
//!         → content queries (Query)
//!         → view (PageView / feed / sitemap)
//!     → Response
//! ```
//!
//! # Design Decisions
//! - Keys are plain strings so configuration can name controllers
//! - Controllers are stateless; everything they need comes from the `Site`
//! - Any controller may hand the request to `error_404` through `Site::forward`

pub mod cache;
pub mod collection;
pub mod error;
pub mod feed;
pub mod home;
pub mod single;
pub mod sitemap;

use axum::http::StatusCode;
use axum::response::Response;
use std::collections::HashMap;

use crate::cache::CacheError;
use crate::content::query::QueryArgs;
use crate::content::{ContentError, Entry};
use crate::http::response;
use crate::routing::Params;
use crate::site::Site;
use crate::view::PageView;

pub const HOME: &str = "home";
pub const SINGLE: &str = "single";
pub const SINGLE_PAGE: &str = "single_page";
pub const COLLECTION: &str = "collection";
pub const ARCHIVE: &str = "archive";
pub const TAXONOMY: &str = "taxonomy";
pub const FEED_ATOM: &str = "feed_atom";
pub const SITEMAP: &str = "sitemap";
pub const SITEMAP_INDEX: &str = "sitemap_index";
pub const CACHE: &str = "cache";
pub const ERROR_404: &str = "error_404";

/// Every built-in controller key.
pub const CONTROLLER_KEYS: &[&str] = &[
    HOME,
    SINGLE,
    SINGLE_PAGE,
    COLLECTION,
    ARCHIVE,
    TAXONOMY,
    FEED_ATOM,
    SITEMAP,
    SITEMAP_INDEX,
    CACHE,
    ERROR_404,
];

/// Failures that turn into a 500 response.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("no controller registered for `{0}`")]
    Missing(String),
}

pub type ControllerResult = Result<Response, ControllerError>;

/// A route target.
pub trait Controller: Send + Sync {
    fn handle(&self, params: &Params, site: &Site) -> ControllerResult;
}

/// Creates a controller instance.
pub type ControllerFactory = fn() -> Box<dyn Controller>;

fn make<C: Controller + Default + 'static>() -> Box<dyn Controller> {
    Box::new(C::default())
}

/// Controllers by key.
#[derive(Default)]
pub struct ControllerRegistry {
    controllers: HashMap<String, Box<dyn Controller>>,
}

impl std::fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in controller.
    pub fn with_defaults() -> Self {
        let factories: [(&str, ControllerFactory); 11] = [
            (HOME, make::<home::Home>),
            (SINGLE, make::<single::Single>),
            (SINGLE_PAGE, make::<single::SinglePage>),
            (COLLECTION, make::<collection::Collection>),
            (ARCHIVE, make::<collection::Archive>),
            (TAXONOMY, make::<collection::Taxonomy>),
            (FEED_ATOM, make::<feed::FeedAtom>),
            (SITEMAP, make::<sitemap::Sitemap>),
            (SITEMAP_INDEX, make::<sitemap::SitemapIndex>),
            (CACHE, make::<cache::Cache>),
            (ERROR_404, make::<error::Error404>),
        ];
        let mut registry = Self::new();
        for (key, factory) in factories {
            registry.register(key, factory);
        }
        registry
    }

    /// Add or replace a controller.
    pub fn register(&mut self, key: &str, factory: ControllerFactory) {
        self.controllers.insert(key.to_string(), factory());
    }

    pub fn get(&self, key: &str) -> Option<&dyn Controller> {
        self.controllers.get(key).map(Box::as_ref)
    }

    pub fn has(&self, key: &str) -> bool {
        self.controllers.contains_key(key)
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.controllers.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

/// Render a page view through the site layout.
pub(crate) fn render(site: &Site, view: PageView<'_>, status: StatusCode) -> Response {
    response::html(status, view.render(site))
}

/// `blog/page/2` → `blog`, `page/2` → ``. Other paths are returned as is.
pub(crate) fn strip_page(path: &str, page: usize) -> &str {
    let marker = format!("page/{page}");
    if path == marker {
        return "";
    }
    path.strip_suffix(&marker)
        .and_then(|p| p.strip_suffix('/'))
        .unwrap_or(path)
}

/// Query for a paged listing: type defaults, then the index entry's
/// `collection` overrides, then the collected type's path when none is set.
pub(crate) fn listing_args(
    site: &Site,
    defaults: &QueryArgs,
    collect: Option<&str>,
    single: Option<&Entry>,
    page: usize,
) -> QueryArgs {
    let overrides = single.and_then(Entry::collection_args).unwrap_or_default();
    let mut args = defaults.merge(&overrides);
    if args.path.is_none() {
        args.path = collect
            .and_then(|name| site.types().get(name))
            .map(|ty| ty.path().to_string());
    }
    args.paginate(page)
}
