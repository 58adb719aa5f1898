//! Content types and the type registry.
//!
//! # Responsibilities
//! - Register named content types with path and URI prefixes
//! - Resolve a type from a content path or a public URI
//! - Describe the routes each routable type contributes
//!
//! # Design Decisions
//! - First registrant wins for duplicate names, paths and URIs
//! - Path and URI indexes are built lazily on first lookup
//! - Empty path or URI resolves to the implicit `page` type

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::config::schema::{ContentTypeConfig, ContentTypeOptions};
use crate::content::query::QueryArgs;
use crate::routing::RouteOptions;

/// Name of the implicit type for top-level pages.
pub const PAGE_TYPE: &str = "page";

/// Name of the type used for in-memory entries.
pub const VIRTUAL_TYPE: &str = "virtual";

/// A registered content type.
#[derive(Debug, Clone)]
pub struct ContentType {
    name: String,
    path: String,
    uri: String,
    options: ContentTypeOptions,
}

impl ContentType {
    pub fn new(name: &str, options: ContentTypeOptions) -> Self {
        let path = options.path.trim_matches('/').to_string();
        let uri = options
            .uri
            .as_deref()
            .map(|u| u.trim_matches('/').to_string())
            .unwrap_or_else(|| path.clone());
        Self {
            name: name.to_string(),
            path,
            uri,
            options,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory under the content root.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Public URI prefix.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn has_routing(&self) -> bool {
        self.options.routing
    }

    pub fn is_public(&self) -> bool {
        self.options.public
    }

    pub fn is_taxonomy(&self) -> bool {
        self.options.taxonomy
    }

    pub fn has_feed(&self) -> bool {
        self.options.feed
    }

    pub fn in_sitemap(&self) -> bool {
        self.options.sitemap && self.options.public
    }

    /// Type whose entries this type's collection lists.
    pub fn collect(&self) -> Option<&str> {
        match &self.options.collect {
            Some(name) => Some(name.as_str()),
            None if self.is_taxonomy() => None,
            None => Some(&self.name),
        }
    }

    /// For taxonomies, the type whose entries carry this taxonomy's terms.
    pub fn term_collect(&self) -> Option<&str> {
        self.options.term_collect.as_deref()
    }

    /// Default collection query.
    pub fn collection_args(&self) -> &QueryArgs {
        &self.options.collection
    }

    /// Default query for a taxonomy term's collection.
    pub fn term_collection_args(&self) -> &QueryArgs {
        &self.options.term_collection
    }

    /// Route templates relative to the URI prefix, in registration order.
    pub fn routes(&self) -> Vec<(String, RouteOptions)> {
        let name = &self.name;
        let mut routes = Vec::new();
        let mut push = |uri: &str, suffix: &str, controller: &str| {
            routes.push((
                uri.to_string(),
                RouteOptions::new(controller).name(format!("{name}.{suffix}")),
            ));
        };

        if !self.uri.is_empty() {
            push("", "collection", "collection");
        }
        push("page/{page}", "collection.paged", "collection");

        if self.options.feed {
            push("feed", "feed", "feed_atom");
        }

        if self.options.date_archives {
            push("{year}", "archive.year", "archive");
            push("{year}/page/{page}", "archive.year.paged", "archive");
            push("{year}/{month}", "archive.month", "archive");
            push("{year}/{month}/page/{page}", "archive.month.paged", "archive");
            push("{year}/{month}/{day}", "archive.day", "archive");
            push("{year}/{month}/{day}/page/{page}", "archive.day.paged", "archive");
        }

        if self.options.time_archives {
            push("{year}/{month}/{day}/{hour}", "archive.hour", "archive");
            push("{year}/{month}/{day}/{hour}/{minute}", "archive.minute", "archive");
            push(
                "{year}/{month}/{day}/{hour}/{minute}/{second}",
                "archive.second",
                "archive",
            );
        }

        if self.is_taxonomy() {
            push("{name}/page/{page}", "term.paged", "taxonomy");
            push("{name}", "term", "taxonomy");
        } else {
            push("{name}", "single", "single");
        }

        routes
            .into_iter()
            .map(|(uri, options)| {
                let options = if uri.contains("{name}") {
                    options.where_slug(&["name"])
                } else {
                    options
                };
                (uri, options)
            })
            .collect()
    }
}

/// Holds content types by name.
#[derive(Debug, Default)]
pub struct ContentTypeRegistry {
    types: Vec<ContentType>,
    by_name: HashMap<String, usize>,
    paths: OnceLock<HashMap<String, usize>>,
    uris: OnceLock<HashMap<String, usize>>,
}

impl ContentTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register configured types, then the implicit `page` and `virtual` types.
    pub fn from_config(types: &[ContentTypeConfig]) -> Self {
        let mut registry = Self::new();
        for config in types {
            registry.add(&config.name, config.options.clone());
        }
        registry.add(
            PAGE_TYPE,
            ContentTypeOptions {
                routing: false,
                collect: None,
                sitemap: false,
                ..ContentTypeOptions::default()
            },
        );
        registry.add(
            VIRTUAL_TYPE,
            ContentTypeOptions {
                path: "_virtual".to_string(),
                public: false,
                routing: false,
                ..ContentTypeOptions::default()
            },
        );
        registry
    }

    /// Register a type. Returns false if the name is already taken.
    pub fn add(&mut self, name: &str, options: ContentTypeOptions) -> bool {
        if self.by_name.contains_key(name) {
            tracing::warn!(content_type = %name, "Content type already registered, ignoring");
            return false;
        }
        self.types.push(ContentType::new(name, options));
        self.by_name.insert(name.to_string(), self.types.len() - 1);
        self.paths = OnceLock::new();
        self.uris = OnceLock::new();
        true
    }

    pub fn get(&self, name: &str) -> Option<&ContentType> {
        self.by_name.get(name).map(|&i| &self.types[i])
    }

    pub fn has(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContentType> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Type whose content path is exactly `path`.
    pub fn type_from_path(&self, path: &str) -> Option<&ContentType> {
        if path.is_empty() {
            return self.get(PAGE_TYPE);
        }
        let index = self.paths.get_or_init(|| self.index_by(ContentType::path));
        index.get(path).map(|&i| &self.types[i])
    }

    /// Type whose public URI is exactly `uri`.
    pub fn type_from_uri(&self, uri: &str) -> Option<&ContentType> {
        if uri.is_empty() {
            return self.get(PAGE_TYPE);
        }
        let index = self.uris.get_or_init(|| self.index_by(ContentType::uri));
        index.get(uri).map(|&i| &self.types[i])
    }

    /// Path lookup, then URI lookup.
    pub fn type_from_path_or_uri(&self, path: &str) -> Option<&ContentType> {
        self.type_from_path(path).or_else(|| self.type_from_uri(path))
    }

    /// Strip trailing segments from `path` until a type's path or URI matches.
    pub fn resolve(&self, path: &str) -> Option<&ContentType> {
        let mut candidate = path.trim_matches('/');
        while let Some((head, _)) = candidate.rsplit_once('/') {
            candidate = head;
            if let Some(found) = self.type_from_path_or_uri(candidate) {
                return Some(found);
            }
        }
        None
    }

    /// All types ordered alphabetically by path.
    pub fn sort_by_path(&self) -> Vec<&ContentType> {
        let mut sorted: Vec<&ContentType> = self.types.iter().collect();
        sorted.sort_by(|a, b| a.path().cmp(b.path()));
        sorted
    }

    fn index_by(&self, key: fn(&ContentType) -> &str) -> HashMap<String, usize> {
        let mut index = HashMap::new();
        for (i, ty) in self.types.iter().enumerate() {
            index.entry(key(ty).to_string()).or_insert(i);
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(path: &str) -> ContentTypeOptions {
        ContentTypeOptions {
            path: path.to_string(),
            ..ContentTypeOptions::default()
        }
    }

    fn registry() -> ContentTypeRegistry {
        ContentTypeRegistry::from_config(&[
            ContentTypeConfig {
                name: "post".into(),
                options: ContentTypeOptions {
                    uri: Some("blog".into()),
                    ..options("_posts")
                },
            },
            ContentTypeConfig {
                name: "tag".into(),
                options: ContentTypeOptions {
                    taxonomy: true,
                    ..options("tags")
                },
            },
        ])
    }

    #[test]
    fn test_lookup_by_path_and_uri() {
        let types = registry();
        assert_eq!(types.type_from_path("_posts").unwrap().name(), "post");
        assert_eq!(types.type_from_uri("blog").unwrap().name(), "post");
        assert!(types.type_from_path("blog").is_none());
        assert_eq!(types.type_from_path_or_uri("blog").unwrap().name(), "post");
    }

    #[test]
    fn test_every_type_found_by_its_path() {
        let types = registry();
        for ty in types.iter() {
            assert_eq!(types.type_from_path(ty.path()).unwrap().name(), ty.name());
        }
    }

    #[test]
    fn test_empty_path_is_page() {
        let types = registry();
        assert_eq!(types.type_from_path("").unwrap().name(), PAGE_TYPE);
        assert_eq!(types.type_from_uri("").unwrap().name(), PAGE_TYPE);
    }

    #[test]
    fn test_first_registrant_wins() {
        let mut types = ContentTypeRegistry::new();
        assert!(types.add("a", options("shared")));
        assert!(types.add("b", options("shared")));
        assert!(!types.add("a", options("other")));
        assert_eq!(types.type_from_path("shared").unwrap().name(), "a");
        assert_eq!(types.get("a").unwrap().path(), "shared");
    }

    #[test]
    fn test_index_rebuilt_after_add() {
        let mut types = ContentTypeRegistry::new();
        types.add("a", options("one"));
        assert!(types.type_from_path("two").is_none());
        types.add("b", options("two"));
        assert_eq!(types.type_from_path("two").unwrap().name(), "b");
    }

    #[test]
    fn test_resolve_strips_segments() {
        let types = registry();
        assert_eq!(types.resolve("blog/2024/03").unwrap().name(), "post");
        assert_eq!(types.resolve("/tags/rust/").unwrap().name(), "tag");
        assert!(types.resolve("unknown/2024").is_none());
        assert!(types.resolve("blog").is_none());
    }

    #[test]
    fn test_sort_by_path() {
        let types = registry();
        let paths: Vec<_> = types.sort_by_path().iter().map(|t| t.path()).collect();
        assert_eq!(paths, ["", "_posts", "_virtual", "tags"]);
    }

    #[test]
    fn test_routes_for_archived_type() {
        let ty = ContentType::new(
            "post",
            ContentTypeOptions {
                feed: true,
                date_archives: true,
                ..options("blog")
            },
        );
        let uris: Vec<_> = ty.routes().into_iter().map(|(uri, _)| uri).collect();
        assert_eq!(uris.first().map(String::as_str), Some(""));
        assert!(uris.contains(&"feed".to_string()));
        assert!(uris.contains(&"{year}/{month}/{day}".to_string()));
        assert_eq!(uris.last().map(String::as_str), Some("{name}"));
    }

    #[test]
    fn test_taxonomy_collects_nothing_by_default() {
        let types = registry();
        assert_eq!(types.get("post").unwrap().collect(), Some("post"));
        assert_eq!(types.get("tag").unwrap().collect(), None);
    }
}
