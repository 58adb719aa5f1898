//! The site front page.

use axum::http::StatusCode;

use crate::content::locator::EXTENSION;
use crate::content::Entry;
use crate::controllers::{listing_args, render, Controller, ControllerResult};
use crate::routing::Params;
use crate::site::Site;
use crate::view::{DocumentTitle, PageView, Pagination};

/// Shows the `app.home_alias` type's collection when that type has an index
/// entry and entries to list, otherwise the top-level `index` entry.
#[derive(Debug, Default)]
pub struct Home;

impl Controller for Home {
    fn handle(&self, params: &Params, site: &Site) -> ControllerResult {
        let page = params.page();
        let query = site.query();
        let alias = site.config().app.home_alias.as_str();

        if let Some(ty) = site.types().get(alias).filter(|_| !alias.is_empty()) {
            if let Some(collect) = ty.collect().filter(|c| site.types().has(c)) {
                let single = query.single(ty.path(), "index")?;
                let args = listing_args(site, ty.collection_args(), Some(collect), single.as_ref(), page);
                let collection = query.collect(&args)?;

                if let Some(single) = single.filter(|_| collection.has_entries()) {
                    let pagination = Pagination::new("", page, collection.pages());
                    let view = PageView::new(DocumentTitle::default().page(page), &single)
                        .collection(Some(&collection))
                        .pagination(&pagination);
                    return Ok(render(site, view, StatusCode::OK));
                }
            }
        }

        match query.single("", "index")? {
            Some(single) if single.is_public() => {
                let collection = match single.collection_args() {
                    Some(args) => Some(query.collect(&args)?),
                    None => None,
                };
                let view = PageView::new(DocumentTitle::default(), &single)
                    .collection(collection.as_ref());
                Ok(render(site, view, StatusCode::OK))
            }
            _ => {
                let missing = site.locator().root().join(format!("index.{EXTENSION}"));
                tracing::warn!(file = %missing.display(), "No home page entry found");
                let notice = Entry::virtual_entry(
                    "Welcome",
                    &format!(
                        "<p>No <code>{}</code> file found.</p>",
                        crate::content::markdown::escape(&missing.display().to_string())
                    ),
                );
                let view = PageView::new(DocumentTitle::default(), &notice);
                Ok(render(site, view, StatusCode::OK))
            }
        }
    }
}
