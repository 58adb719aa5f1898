//! Not-found responses.

use axum::http::StatusCode;

use crate::content::Entry;
use crate::controllers::{render, Controller, ControllerResult};
use crate::routing::Params;
use crate::site::Site;
use crate::view::{DocumentTitle, PageView};

/// Content directory holding user-provided error pages.
pub const ERROR_PATH: &str = "_error";

/// Renders `_error/404.md`, or a built-in notice, with status 404.
#[derive(Debug, Default)]
pub struct Error404;

impl Controller for Error404 {
    fn handle(&self, params: &Params, site: &Site) -> ControllerResult {
        tracing::debug!(path = %params.path(), "Rendering not found page");
        metrics::counter!("folio_not_found_total").increment(1);

        let single = site
            .query()
            .single(ERROR_PATH, "404")?
            .unwrap_or_else(|| {
                Entry::virtual_entry("Nothing Found", "<p>Sorry, nothing was found here.</p>")
            });
        let view = PageView::new(DocumentTitle::new(single.title()), &single);
        Ok(render(site, view, StatusCode::NOT_FOUND))
    }
}
