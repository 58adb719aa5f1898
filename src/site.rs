//! A fully assembled site: content types, routes, controllers and cache.
//!
//! # Responsibilities
//! - Build the route table from content types and configuration
//! - Check every route targets a registered controller
//! - Dispatch a request path to its controller
//!
//! # Design Decisions
//! - A `Site` is immutable; a config reload builds a new one
//! - Type routes are grouped under each type's URI so the router can prune
//! - Types are registered in reverse path order so nested URIs
//!   (`blog/notes`) come before their parents (`blog`)
//!
//! # Route Order
//! ```text
//! content type groups (reverse path order)
//! feed, page/{page}          when app.home_alias names a type
//! sitemap/{type}, sitemap    when app.sitemap
//! /
//! purge/cache/{name}/{key}, purge/cache/{key}
//! configured [[routes]]
//! {*}                        catch-all page route
//! ```

use axum::response::Response;
use std::path::PathBuf;

use crate::cache::CacheRegistry;
use crate::config::schema::SiteConfig;
use crate::content::types::PAGE_TYPE;
use crate::content::{ContentLocator, ContentTypeRegistry, Entry, Query};
use crate::controllers::{
    ControllerError, ControllerRegistry, ControllerResult, CACHE, ERROR_404, FEED_ATOM, HOME,
    SINGLE_PAGE, SITEMAP, SITEMAP_INDEX,
};
use crate::http::response;
use crate::lifecycle::startup::StartupError;
use crate::routing::{Params, RouteOptions, RouteTable, Router, UrlBuilder};

/// Everything needed to answer requests for one configuration.
#[derive(Debug)]
pub struct Site {
    config: SiteConfig,
    types: ContentTypeRegistry,
    router: Router,
    controllers: ControllerRegistry,
    locator: ContentLocator,
    cache: CacheRegistry,
    url: UrlBuilder,
}

impl Site {
    /// Assemble a site with the built-in controllers.
    pub fn build(config: SiteConfig) -> Result<Self, StartupError> {
        Self::with_controllers(config, ControllerRegistry::with_defaults())
    }

    pub fn with_controllers(
        config: SiteConfig,
        controllers: ControllerRegistry,
    ) -> Result<Self, StartupError> {
        let types = ContentTypeRegistry::from_config(&config.content);
        let routes = build_routes(&config, &types)?;

        for route in routes.iter() {
            if !controllers.has(route.controller()) {
                return Err(StartupError::UnknownController {
                    uri: route.uri().to_string(),
                    controller: route.controller().to_string(),
                });
            }
        }

        let cache = CacheRegistry::from_config(PathBuf::from(&config.paths.cache_dir), &config.cache)?;
        let locator = ContentLocator::new(&config.paths.content_dir);
        let url = UrlBuilder::new(&config.app.url);

        tracing::info!(
            content_types = types.len(),
            routes = routes.len(),
            groups = routes.groups().len(),
            cache_stores = cache.stores().len(),
            "Site assembled"
        );

        Ok(Self {
            config,
            types,
            router: Router::new(routes),
            controllers,
            locator,
            cache,
            url,
        })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn types(&self) -> &ContentTypeRegistry {
        &self.types
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn routes(&self) -> &RouteTable {
        self.router.routes()
    }

    pub fn controllers(&self) -> &ControllerRegistry {
        &self.controllers
    }

    pub fn locator(&self) -> &ContentLocator {
        &self.locator
    }

    pub fn query(&self) -> Query<'_> {
        Query::new(&self.locator)
    }

    pub fn cache(&self) -> &CacheRegistry {
        &self.cache
    }

    pub fn url(&self) -> &UrlBuilder {
        &self.url
    }

    /// Public URL of an entry: `{type uri}/{slug}` for typed entries, the
    /// content path for pages, and the directory itself for `index` entries.
    pub fn entry_url(&self, entry: &Entry) -> String {
        let base = match self.types.type_from_path(entry.dir()) {
            Some(ty) if ty.name() != PAGE_TYPE => ty.uri(),
            _ => entry.dir(),
        };
        if entry.slug() == "index" {
            self.url.to(base)
        } else if base.is_empty() {
            self.url.to(entry.slug())
        } else {
            self.url.to(&format!("{base}/{}", entry.slug()))
        }
    }

    /// Run the controller registered under `key`.
    pub fn forward(&self, key: &str, params: &Params) -> ControllerResult {
        match self.controllers.get(key) {
            Some(controller) => controller.handle(params, self),
            None => Err(ControllerError::Missing(key.to_string())),
        }
    }

    /// Route a request path and produce a response. Errors become a 500.
    pub fn dispatch(&self, request_path: &str) -> Response {
        let (key, params) = match self.router.match_path(request_path) {
            Some(found) => {
                tracing::debug!(
                    path = %request_path,
                    route = %found.route.uri(),
                    controller = %found.route.controller(),
                    tier = ?found.tier,
                    "Route matched"
                );
                (found.route.controller().to_string(), found.params)
            }
            None => {
                tracing::debug!(path = %request_path, "No route matched");
                let mut params = Params::new();
                params.insert("path", request_path.trim_matches('/'));
                (ERROR_404.to_string(), params)
            }
        };

        match self.forward(&key, &params) {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(path = %request_path, controller = %key, error = %e, "Controller failed");
                response::internal_error()
            }
        }
    }
}

/// Build the route table for a configuration.
pub fn build_routes(
    config: &SiteConfig,
    types: &ContentTypeRegistry,
) -> Result<RouteTable, StartupError> {
    let mut routes = RouteTable::new();
    let add = |routes: &mut RouteTable, uri: &str, options: RouteOptions| {
        routes
            .add(uri, options)
            .map(|_| ())
            .map_err(|source| StartupError::Route {
                uri: uri.to_string(),
                source,
            })
    };

    for ty in types.sort_by_path().into_iter().rev() {
        if !ty.has_routing() {
            continue;
        }
        if ty.uri().is_empty() {
            for (uri, options) in ty.routes() {
                add(&mut routes, &uri, options)?;
            }
        } else {
            routes
                .add_group(ty.uri(), ty.routes())
                .map_err(|source| StartupError::Route {
                    uri: ty.uri().to_string(),
                    source,
                })?;
        }
    }

    let alias = config.app.home_alias.as_str();
    if let Some(home) = types.get(alias).filter(|_| !alias.is_empty()) {
        if home.has_feed() {
            add(&mut routes, "feed", RouteOptions::new(FEED_ATOM).name("home.feed"))?;
        }
        add(&mut routes, "page/{page}", RouteOptions::new(HOME).name("home.paged"))?;
    }

    if config.app.sitemap {
        add(
            &mut routes,
            "sitemap/{type}",
            RouteOptions::new(SITEMAP).name("sitemap.type").where_slug(&["type"]),
        )?;
        add(&mut routes, "sitemap", RouteOptions::new(SITEMAP_INDEX).name("sitemap"))?;
    }

    add(&mut routes, "/", RouteOptions::new(HOME).name("home"))?;
    add(
        &mut routes,
        "purge/cache/{name}/{key}",
        RouteOptions::new(CACHE).name("cache.purge.store"),
    )?;
    add(
        &mut routes,
        "purge/cache/{key}",
        RouteOptions::new(CACHE).name("cache.purge"),
    )?;

    for configured in &config.routes {
        let uri = match configured.uri.trim_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        add(&mut routes, uri, configured.options())?;
    }

    add(&mut routes, "{*}", RouteOptions::new(SINGLE_PAGE).name("single_page"))?;
    Ok(routes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::routing::MatchTier;
    use std::fs;

    fn config(root: &std::path::Path, app: &str) -> SiteConfig {
        parse_config(&format!(
            r#"
[app]
url = "https://example.com/"
{app}

[paths]
content_dir = "{content}"
cache_dir = "{cache}"

[[content]]
name = "post"
path = "posts"
uri = "blog"
feed = true

[[content]]
name = "note"
path = "posts/notes"
uri = "blog/notes"

[[routes]]
uri = "/"
controller = "single_page"
"#,
            content = root.join("content").display(),
            cache = root.join("cache").display(),
        ))
        .unwrap()
    }

    #[test]
    fn test_route_order() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::build(config(dir.path(), "home_alias = \"post\"\nsitemap = true")).unwrap();
        let uris: Vec<_> = site.routes().iter().map(|r| r.uri().to_string()).collect();

        let position = |uri: &str| uris.iter().position(|u| u == uri).unwrap();
        assert!(position("blog/notes/{name}") < position("blog/{name}"));
        assert!(position("blog/{name}") < position("feed"));
        assert!(position("feed") < position("sitemap/{type}"));
        assert!(position("sitemap") < position("/"));
        assert!(position("purge/cache/{name}/{key}") < position("purge/cache/{key}"));
        assert_eq!(uris.last().map(String::as_str), Some("{*}"));
        assert_eq!(site.routes().groups().len(), 2);

        // A configured route for "/" replaces the built-in home route.
        assert_eq!(site.routes().get("/").unwrap().controller(), SINGLE_PAGE);
    }

    #[test]
    fn test_optional_routes_absent() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::build(config(dir.path(), "")).unwrap();
        assert!(!site.routes().has("feed"));
        assert!(!site.routes().has("page/{page}"));
        assert!(!site.routes().has("sitemap"));
    }

    #[test]
    fn test_nested_type_wins_in_group_tier() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::build(config(dir.path(), "")).unwrap();

        let found = site.router().match_path("/blog/notes/first").unwrap();
        assert_eq!(found.route.uri(), "blog/notes/{name}");
        assert_eq!(found.tier, MatchTier::Group);
        assert_eq!(found.params.get("name"), Some("first"));

        let found = site.router().match_path("/about/team").unwrap();
        assert_eq!(found.route.name(), "single_page");
    }

    #[test]
    fn test_unknown_controller_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), "");
        let err = Site::with_controllers(config, ControllerRegistry::new()).unwrap_err();
        assert!(matches!(err, StartupError::UnknownController { .. }));
    }

    #[test]
    fn test_entry_urls() {
        let dir = tempfile::tempdir().unwrap();
        let content = dir.path().join("content");
        fs::create_dir_all(content.join("posts")).unwrap();
        fs::create_dir_all(content.join("guides/intro")).unwrap();
        fs::write(content.join("posts/hello.md"), "Hi").unwrap();
        fs::write(content.join("posts/index.md"), "Blog").unwrap();
        fs::write(content.join("about.md"), "About").unwrap();
        fs::write(content.join("guides/intro/index.md"), "Intro").unwrap();

        let site = Site::build(config(dir.path(), "")).unwrap();
        let locator = site.locator();
        let url = |path: &str, slug: &str| site.entry_url(&locator.find(path, slug).unwrap().unwrap());

        assert_eq!(url("posts", "hello"), "https://example.com/blog/hello");
        assert_eq!(url("posts", "index"), "https://example.com/blog");
        assert_eq!(url("", "about"), "https://example.com/about");
        assert_eq!(url("guides/intro", "index"), "https://example.com/guides/intro");
    }

    #[test]
    fn test_dispatch_statuses() {
        let dir = tempfile::tempdir().unwrap();
        let content = dir.path().join("content");
        fs::create_dir_all(&content).unwrap();
        fs::write(content.join("about.md"), "---\ntitle: About\n---\nHello").unwrap();

        let site = Site::build(config(dir.path(), "")).unwrap();
        assert_eq!(site.dispatch("/about").status(), axum::http::StatusCode::OK);
        assert_eq!(site.dispatch("/nope").status(), axum::http::StatusCode::NOT_FOUND);
        assert_eq!(site.dispatch("/_hidden").status(), axum::http::StatusCode::NOT_FOUND);
    }

    fn blog_fixture() -> (tempfile::TempDir, Site) {
        let dir = tempfile::tempdir().unwrap();
        let posts = dir.path().join("content/posts");
        fs::create_dir_all(&posts).unwrap();
        fs::write(posts.join("index.md"), "---\ntitle: Blog\n---\n").unwrap();
        fs::write(
            posts.join("a&b.md"),
            "---\ntitle: Salt & Pepper\ndate: 2024-01-02\n---\nSee [about](/about).",
        )
        .unwrap();
        let site = Site::build(config(dir.path(), "")).unwrap();
        (dir, site)
    }

    async fn body(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_page_number_past_usize_range_is_not_found() {
        let (_dir, site) = blog_fixture();
        assert_eq!(site.dispatch("/blog").status(), axum::http::StatusCode::OK);
        assert_eq!(
            site.dispatch("/blog/page/10000000000000000000").status(),
            axum::http::StatusCode::NOT_FOUND
        );
        assert_eq!(
            site.dispatch(&format!("/blog/page/{}", usize::MAX)).status(),
            axum::http::StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_entry_urls_escaped_in_listing_and_feed() {
        let (_dir, site) = blog_fixture();

        let listing = body(site.dispatch("/blog")).await;
        assert!(listing.contains("href=\"https://example.com/blog/a&amp;b\""));
        assert!(!listing.contains("blog/a&b\""));

        let feed = body(site.dispatch("/blog/feed")).await;
        assert!(feed.contains("<link href=\"https://example.com/blog/a&amp;b\"/>"));
        assert!(feed.contains("<id>https://example.com/blog/a&amp;b</id>"));
        assert!(feed.contains("<link rel=\"self\" href=\"https://example.com/blog/feed\"/>"));
        // Entry bodies link to absolute site URLs.
        assert!(feed.contains("https://example.com/about"));
    }
}
