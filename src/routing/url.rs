//! URL generation from the site base URL and named routes.

use crate::routing::routes::RouteTable;

/// Builds absolute URLs for the site.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    base: String,
}

impl UrlBuilder {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    /// Site URL with `append` joined on.
    pub fn to(&self, append: &str) -> String {
        let append = append.trim_matches('/');
        if append.is_empty() || append == "/" {
            format!("{}/", self.base)
        } else {
            format!("{}/{}", self.base, append)
        }
    }

    /// URL for a route found by URI or by name, or `None` if there is no such route.
    pub fn route(&self, routes: &RouteTable, name: &str, params: &[(&str, &str)]) -> Option<String> {
        let route = routes.get(name).or_else(|| routes.named(name))?;
        Some(self.to(&parse_params(route.uri(), params)))
    }
}

/// Replace `{param}` occurrences with values.
pub fn parse_params(path: &str, params: &[(&str, &str)]) -> String {
    params.iter().fold(path.to_string(), |acc, (name, value)| {
        acc.replace(&format!("{{{name}}}"), value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::route::RouteOptions;

    #[test]
    fn test_to_joins_paths() {
        let url = UrlBuilder::new("https://example.com/");
        assert_eq!(url.to(""), "https://example.com/");
        assert_eq!(url.to("/blog/"), "https://example.com/blog");
    }

    #[test]
    fn test_route_by_name_substitutes_params() {
        let mut table = RouteTable::new();
        table
            .add("blog/page/{page}", RouteOptions::new("collection").name("blog.paged"))
            .unwrap();
        let url = UrlBuilder::new("https://example.com");
        assert_eq!(
            url.route(&table, "blog.paged", &[("page", "2")]).as_deref(),
            Some("https://example.com/blog/page/2")
        );
        assert!(url.route(&table, "nope", &[]).is_none());
    }
}
