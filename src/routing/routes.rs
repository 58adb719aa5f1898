//! Route table: ordered routes, name index, and prefix groups.

use std::collections::HashMap;

use crate::routing::pattern::PatternError;
use crate::routing::route::{Route, RouteOptions};

/// A set of routes sharing a URI prefix.
#[derive(Debug, Clone)]
pub struct RouteGroup {
    prefix: String,
    members: Vec<usize>,
}

impl RouteGroup {
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Indexes into the owning table.
    pub fn members(&self) -> &[usize] {
        &self.members
    }
}

/// Ordered collection of routes.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
    by_uri: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
    groups: Vec<RouteGroup>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route. Re-adding a URI replaces the earlier route in place.
    pub fn add(&mut self, uri: &str, options: RouteOptions) -> Result<usize, PatternError> {
        let route = Route::new(uri, options)?;
        let name = route.name().to_string();

        let index = match self.by_uri.get(uri) {
            Some(&index) => {
                let previous = self.routes[index].name().to_string();
                if self.by_name.get(&previous) == Some(&index) {
                    self.by_name.remove(&previous);
                }
                self.routes[index] = route;
                index
            }
            None => {
                self.routes.push(route);
                let index = self.routes.len() - 1;
                self.by_uri.insert(uri.to_string(), index);
                index
            }
        };

        self.by_name.insert(name, index);
        Ok(index)
    }

    /// Add routes under `prefix`. An empty relative URI registers the prefix itself.
    pub fn add_group<I, S>(&mut self, prefix: &str, routes: I) -> Result<(), PatternError>
    where
        I: IntoIterator<Item = (S, RouteOptions)>,
        S: AsRef<str>,
    {
        let prefix = prefix.trim_matches('/').to_string();
        let mut members = Vec::new();

        for (uri, options) in routes {
            let uri = uri.as_ref().trim_matches('/');
            let full = match (prefix.is_empty(), uri.is_empty()) {
                (true, _) => uri.to_string(),
                (false, true) => prefix.clone(),
                (false, false) => format!("{prefix}/{uri}"),
            };
            if full.is_empty() {
                continue;
            }
            members.push(self.add(&full, options)?);
        }

        match self.groups.iter_mut().find(|g| g.prefix == prefix) {
            Some(group) => group.members = members,
            None => self.groups.push(RouteGroup { prefix, members }),
        }
        Ok(())
    }

    /// Route registered under exactly this URI.
    pub fn get(&self, uri: &str) -> Option<&Route> {
        self.by_uri.get(uri).map(|&i| &self.routes[i])
    }

    pub fn has(&self, uri: &str) -> bool {
        self.by_uri.contains_key(uri)
    }

    /// Route by name.
    pub fn named(&self, name: &str) -> Option<&Route> {
        self.by_name.get(name).map(|&i| &self.routes[i])
    }

    pub fn at(&self, index: usize) -> Option<&Route> {
        self.routes.get(index)
    }

    pub fn groups(&self) -> &[RouteGroup] {
        &self.groups
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_indexes_by_uri_and_name() {
        let mut table = RouteTable::new();
        table
            .add("about", RouteOptions::new("single_page").name("about.page"))
            .unwrap();
        assert!(table.has("about"));
        assert_eq!(table.named("about.page").unwrap().uri(), "about");
        assert!(table.named("missing").is_none());
    }

    #[test]
    fn test_readd_replaces_in_place() {
        let mut table = RouteTable::new();
        table.add("a", RouteOptions::new("x").name("first")).unwrap();
        table.add("b", RouteOptions::new("y")).unwrap();
        table.add("a", RouteOptions::new("z").name("second")).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.at(0).unwrap().controller(), "z");
        assert!(table.named("first").is_none());
        assert_eq!(table.named("second").unwrap().uri(), "a");
    }

    #[test]
    fn test_group_prefixes_uris() {
        let mut table = RouteTable::new();
        table
            .add_group(
                "/blog/",
                vec![
                    ("", RouteOptions::new("collection")),
                    ("page/{page}", RouteOptions::new("collection")),
                    ("{name}", RouteOptions::new("single")),
                ],
            )
            .unwrap();

        let uris: Vec<_> = table.iter().map(Route::uri).collect();
        assert_eq!(uris, ["blog", "blog/page/{page}", "blog/{name}"]);
        assert_eq!(table.groups().len(), 1);
        assert_eq!(table.groups()[0].prefix(), "blog");
        assert_eq!(table.groups()[0].members(), [0, 1, 2]);
    }
}
