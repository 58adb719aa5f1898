//! Single entry views.

use axum::http::StatusCode;

use crate::content::query::QueryArgs;
use crate::content::types::PAGE_TYPE;
use crate::content::Entry;
use crate::controllers::{render, Controller, ControllerResult, ERROR_404};
use crate::routing::Params;
use crate::site::Site;
use crate::view::{DocumentTitle, PageView};

/// Params that never name a taxonomy filter.
const RESERVED: &[&str] = &["name", "path", "page", "year", "month", "day", "author"];

/// One entry of a content type, addressed by `{name}` under the type's URI.
///
/// Date params (`year`, `month`, `day`), `author` and any param named after a
/// content type narrow the match, so configured routes such as
/// `blog/{year}/{month}/{name}` or `{tag}/{name}` only serve entries that agree.
#[derive(Debug, Default)]
pub struct Single;

impl Controller for Single {
    fn handle(&self, params: &Params, site: &Site) -> ControllerResult {
        let Some(name) = params.get("name") else {
            return site.forward(ERROR_404, params);
        };
        let Some(ty) = site.types().resolve(params.path()).filter(|t| t.is_public()) else {
            return site.forward(ERROR_404, params);
        };

        let mut filter = QueryArgs {
            year: params.get("year").and_then(|v| v.parse().ok()),
            month: params.get("month").and_then(|v| v.parse().ok()),
            day: params.get("day").and_then(|v| v.parse().ok()),
            ..QueryArgs::default()
        };
        if let Some(other) = site
            .types()
            .iter()
            .filter(|t| t.name() != PAGE_TYPE && !RESERVED.contains(&t.name()))
            .find(|t| params.contains(t.name()))
        {
            filter.meta_key = Some(other.name().to_string());
            filter.meta_value = params.get(other.name()).map(str::to_string);
        }
        let author = params.get("author");

        let single = site.query().single(ty.path(), name)?.filter(|entry| {
            entry.is_public()
                && filter.matches(entry)
                && author.map_or(true, |a| entry.author() == Some(a))
        });

        match single {
            Some(single) => show(site, &single),
            None => site.forward(ERROR_404, params),
        }
    }
}

/// A top-level page addressed by its content path: `path/index.md`, or
/// `parent/name.md` when there is no index.
///
/// Any segment starting with `_` is private and yields 404, as do paths
/// inside a non-public content type.
#[derive(Debug, Default)]
pub struct SinglePage;

impl Controller for SinglePage {
    fn handle(&self, params: &Params, site: &Site) -> ControllerResult {
        let path = params.path().trim_matches('/');
        if path.split('/').any(|segment| segment.starts_with('_')) {
            return site.forward(ERROR_404, params);
        }
        let (parent, name) = path.rsplit_once('/').unwrap_or(("", path));
        if site
            .types()
            .resolve(path)
            .or_else(|| site.types().type_from_path(parent))
            .is_some_and(|t| !t.is_public())
        {
            return site.forward(ERROR_404, params);
        }

        let query = site.query();
        let single = match query.single(path, "index")? {
            Some(entry) => Some(entry),
            None => query.single(parent, name)?,
        };

        match single.filter(Entry::is_public) {
            Some(single) => show(site, &single),
            None => site.forward(ERROR_404, params),
        }
    }
}

fn show(site: &Site, single: &Entry) -> ControllerResult {
    let collection = match single.collection_args() {
        Some(args) => Some(site.query().collect(&args)?),
        None => None,
    };
    let view = PageView::new(DocumentTitle::new(single.title()), single)
        .collection(collection.as_ref());
    Ok(render(site, view, StatusCode::OK))
}
