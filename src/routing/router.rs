//! Route lookup.
//!
//! # Responsibilities
//! - Normalize the request path
//! - Try exact, group, then full-scan matching
//! - Build the parameter map for the matched route
//!
//! # Design Decisions
//! - Immutable after construction; shared via Arc
//! - O(1) exact lookup, group prefixes prune the pattern scan
//! - Explicit `None` for no match; the caller forwards to the 404 controller

use std::collections::BTreeMap;

use crate::routing::matcher::{Matcher, RegexMatcher};
use crate::routing::route::Route;
use crate::routing::routes::RouteTable;

/// Parameters extracted from a matched path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// The `path` param, or empty.
    pub fn path(&self) -> &str {
        self.get("path").unwrap_or_default()
    }

    /// The `page` param as a 1-based page number.
    pub fn page(&self) -> usize {
        self.get("page")
            .and_then(|p| p.parse().ok())
            .filter(|&p| p > 0)
            .unwrap_or(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Which tier produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Exact,
    Group,
    Scan,
}

/// A successful route match.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub params: Params,
    pub tier: MatchTier,
}

/// Trim surrounding slashes unless the path is the site root.
pub fn normalize_path(path: &str) -> String {
    if path == "/" || path.is_empty() {
        return "/".to_string();
    }
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Matches request paths against a route table.
#[derive(Debug)]
pub struct Router<M: Matcher = RegexMatcher> {
    routes: RouteTable,
    matcher: M,
}

impl Router<RegexMatcher> {
    pub fn new(routes: RouteTable) -> Self {
        Self::with_matcher(routes, RegexMatcher)
    }
}

impl<M: Matcher> Router<M> {
    pub fn with_matcher(routes: RouteTable, matcher: M) -> Self {
        Self { routes, matcher }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn matcher(&self) -> &M {
        &self.matcher
    }

    /// Find the route for a request path.
    pub fn match_path(&self, request_path: &str) -> Option<RouteMatch<'_>> {
        let path = normalize_path(request_path);

        if let Some(route) = self.routes.get(&path).filter(|r| !r.has_parameters()) {
            let mut params = Params::new();
            params.insert("path", path.as_str());
            return Some(RouteMatch {
                route,
                params,
                tier: MatchTier::Exact,
            });
        }

        let mut tested = vec![false; self.routes.len()];

        for group in self.routes.groups() {
            if !path.starts_with(&format!("{}/", group.prefix())) {
                continue;
            }
            if let Some(found) = self.locate(group.members().iter().copied(), &path, &mut tested) {
                return Some(RouteMatch {
                    tier: MatchTier::Group,
                    ..found
                });
            }
        }

        self.locate(0..self.routes.len(), &path, &mut tested)
    }

    fn locate(
        &self,
        indexes: impl Iterator<Item = usize>,
        path: &str,
        tested: &mut [bool],
    ) -> Option<RouteMatch<'_>> {
        for index in indexes {
            if tested[index] {
                continue;
            }
            tested[index] = true;

            let Some(route) = self.routes.at(index) else {
                continue;
            };
            if !route.has_parameters() {
                continue;
            }
            let Some(values) = self.matcher.captures(route, path) else {
                continue;
            };

            let mut params: Params = route
                .parameters()
                .iter()
                .cloned()
                .zip(values)
                .collect();
            if !params.contains("path") {
                params.insert("path", path);
            }
            return Some(RouteMatch {
                route,
                params,
                tier: MatchTier::Scan,
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::route::RouteOptions;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct CountingMatcher {
        calls: AtomicUsize,
        seen: Mutex<Vec<String>>,
    }

    impl Matcher for CountingMatcher {
        fn captures(&self, route: &Route, path: &str) -> Option<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(route.uri().to_string());
            RegexMatcher.captures(route, path)
        }
    }

    fn blog_table() -> RouteTable {
        let mut table = RouteTable::new();
        table
            .add(
                "blog/{year}/{month}/{slug}",
                RouteOptions::new("single").where_year(&["year"]),
            )
            .unwrap();
        table.add("/", RouteOptions::new("home")).unwrap();
        table.add("{*}", RouteOptions::new("single_page")).unwrap();
        table
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("//"), "/");
        assert_eq!(normalize_path("/blog/post/"), "blog/post");
    }

    #[test]
    fn test_dated_route_extracts_params() {
        let router = Router::new(blog_table());
        let m = router.match_path("/blog/2024/03/hello-world").unwrap();
        assert_eq!(m.route.controller(), "single");
        assert_eq!(m.params.get("year"), Some("2024"));
        assert_eq!(m.params.get("month"), Some("03"));
        assert_eq!(m.params.get("slug"), Some("hello-world"));
        assert_eq!(m.params.path(), "blog/2024/03/hello-world");
    }

    #[test]
    fn test_constrained_year_falls_through() {
        let mut table = RouteTable::new();
        table
            .add(
                "blog/{year}/{month}/{slug}",
                RouteOptions::new("single").where_year(&["year"]),
            )
            .unwrap();
        let router = Router::new(table);
        assert!(router.match_path("blog/abcd/03/hello-world").is_none());
    }

    #[test]
    fn test_exact_match_wins() {
        let router = Router::new(blog_table());
        let m = router.match_path("/").unwrap();
        assert_eq!(m.tier, MatchTier::Exact);
        assert_eq!(m.route.controller(), "home");
        assert_eq!(m.params.path(), "/");
    }

    #[test]
    fn test_exact_tier_ignores_placeholder_keys() {
        let router = Router::new(blog_table());
        let m = router.match_path("blog/{year}/{month}/{slug}").unwrap();
        assert_eq!(m.tier, MatchTier::Scan);
        assert_eq!(m.route.controller(), "single_page");
    }

    #[test]
    fn test_catch_all_keeps_path() {
        let router = Router::new(blog_table());
        let m = router.match_path("/about/team/").unwrap();
        assert_eq!(m.route.controller(), "single_page");
        assert_eq!(m.params.get("*"), Some("about/team"));
        assert_eq!(m.params.path(), "about/team");
    }

    #[test]
    fn test_explicit_path_param_is_kept() {
        let mut table = RouteTable::new();
        table.add("files/{path}", RouteOptions::new("single")).unwrap();
        let router = Router::new(table);
        let m = router.match_path("files/readme").unwrap();
        assert_eq!(m.params.path(), "readme");
    }

    #[test]
    fn test_params_follow_template_order() {
        let mut table = RouteTable::new();
        table
            .add("{month}-{year}/{slug}", RouteOptions::new("archive"))
            .unwrap();
        let router = Router::new(table);
        let m = router.match_path("05-1999/party").unwrap();
        assert_eq!(m.params.get("year"), Some("1999"));
        assert_eq!(m.params.get("month"), Some("05"));
        assert_eq!(m.params.get("slug"), Some("party"));
    }

    #[test]
    fn test_first_registered_route_wins() {
        let mut table = RouteTable::new();
        table.add("docs/{a}", RouteOptions::new("first")).unwrap();
        table.add("{x}/{y}", RouteOptions::new("second")).unwrap();
        let router = Router::new(table);
        assert_eq!(router.match_path("docs/intro").unwrap().route.controller(), "first");
    }

    #[test]
    fn test_group_match_prunes_scan() {
        let mut table = RouteTable::new();
        table.add("other/{a}", RouteOptions::new("x")).unwrap();
        table.add("more/{a}/{b}", RouteOptions::new("x")).unwrap();
        table
            .add_group(
                "blog",
                vec![
                    ("page/{page}", RouteOptions::new("collection")),
                    ("{name}", RouteOptions::new("single")),
                ],
            )
            .unwrap();
        table.add("{*}", RouteOptions::new("single_page")).unwrap();

        let router = Router::with_matcher(table, CountingMatcher::default());
        let m = router.match_path("blog/first-post").unwrap();

        assert_eq!(m.tier, MatchTier::Group);
        assert_eq!(m.route.controller(), "single");
        assert_eq!(m.params.get("name"), Some("first-post"));
        assert_eq!(router.matcher().calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            *router.matcher().seen.lock().unwrap(),
            ["blog/page/{page}", "blog/{name}"]
        );
    }

    #[test]
    fn test_group_miss_scans_remaining_routes_once() {
        let mut table = RouteTable::new();
        table
            .add_group("blog", vec![("{name}", RouteOptions::new("single"))])
            .unwrap();
        table.add("{*}", RouteOptions::new("single_page")).unwrap();

        let router = Router::with_matcher(table, CountingMatcher::default());
        let m = router.match_path("blog/a/b").unwrap();

        assert_eq!(m.tier, MatchTier::Scan);
        assert_eq!(m.route.controller(), "single_page");
        assert_eq!(router.matcher().calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_no_match() {
        let mut table = RouteTable::new();
        table.add("a/{b}", RouteOptions::new("x")).unwrap();
        let router = Router::new(table);
        assert!(router.match_path("c/d").is_none());
    }

    #[test]
    fn test_page_param_defaults() {
        let params: Params = [("page", "3")].into_iter().collect();
        assert_eq!(params.page(), 3);
        assert_eq!(Params::new().page(), 1);
        let params: Params = [("page", "0")].into_iter().collect();
        assert_eq!(params.page(), 1);
    }
}
