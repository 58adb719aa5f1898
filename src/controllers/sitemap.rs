//! XML sitemaps per content type and the sitemap index.

use crate::content::query::QueryArgs;
use crate::controllers::{Controller, ControllerResult, ERROR_404};
use crate::http::response::{self, XML};
use crate::routing::Params;
use crate::site::Site;
use crate::view::sitemap;

/// `sitemap/{type}`: the collection URL and every public entry of one type.
#[derive(Debug, Default)]
pub struct Sitemap;

impl Controller for Sitemap {
    fn handle(&self, params: &Params, site: &Site) -> ControllerResult {
        let Some(ty) = params
            .get("type")
            .and_then(|name| site.types().get(name))
            .filter(|t| t.in_sitemap() && t.has_routing())
        else {
            return site.forward(ERROR_404, params);
        };

        let args = QueryArgs {
            path: Some(ty.path().to_string()),
            number: Some(usize::MAX),
            ..QueryArgs::default()
        };
        let collection = site.query().collect(&args)?;
        if !collection.has_entries() {
            return site.forward(ERROR_404, params);
        }

        let newest = collection.entries().iter().filter_map(|e| e.date()).max();
        let index = (!ty.uri().is_empty()).then(|| (site.url().to(ty.uri()), newest));
        let entries = collection
            .entries()
            .iter()
            .map(|entry| (site.entry_url(entry), entry.date()));

        Ok(response::xml(XML, sitemap::urlset(index.into_iter().chain(entries))))
    }
}

/// `sitemap`: links to the sitemap of every routable, public type.
#[derive(Debug, Default)]
pub struct SitemapIndex;

impl Controller for SitemapIndex {
    fn handle(&self, _params: &Params, site: &Site) -> ControllerResult {
        let locations = site
            .types()
            .iter()
            .filter(|t| t.in_sitemap() && t.has_routing())
            .map(|t| site.url().to(&format!("sitemap/{}", t.name())));
        Ok(response::xml(XML, sitemap::index(locations)))
    }
}
