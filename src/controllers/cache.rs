//! Cache purge endpoint.

use axum::http::StatusCode;

use crate::content::markdown::escape;
use crate::content::Entry;
use crate::controllers::{render, Controller, ControllerResult};
use crate::routing::Params;
use crate::site::Site;
use crate::view::{DocumentTitle, PageView};

/// `purge/cache/{name}/{key}` flushes one store; `purge/cache/{key}` flushes
/// every store. `key` must equal a non-empty `cache.purge_key`.
#[derive(Debug, Default)]
pub struct Cache;

impl Controller for Cache {
    fn handle(&self, params: &Params, site: &Site) -> ControllerResult {
        let purge_key = site.config().cache.purge_key.as_str();
        let key = params.get("key").unwrap_or_default();
        let store = params.get("name").unwrap_or_default();
        let authorized = !purge_key.is_empty() && key == purge_key;

        let outcome = match (authorized, store.is_empty()) {
            (false, _) => None,
            (true, false) => site.cache().flush(store)?.then(|| {
                (
                    "Cache Store Flushed",
                    format!(
                        "<p>Successfully flushed and purged all data from the <code>{}</code> cache store.</p>",
                        escape(store)
                    ),
                )
            }),
            (true, true) => {
                site.cache().purge()?;
                Some((
                    "Cache Stores Flushed",
                    "<p>Successfully flushed and purged data from all cache stores.</p>".to_string(),
                ))
            }
        };

        let (status, title, content) = match outcome {
            Some((title, content)) => {
                tracing::info!(store = %store, "Cache purge request accepted");
                (StatusCode::OK, title, content)
            }
            None => {
                tracing::warn!(store = %store, "Rejected cache purge request");
                (
                    StatusCode::FORBIDDEN,
                    "Cache Flush Failure",
                    "<p>Invalid cache flush request.</p>".to_string(),
                )
            }
        };

        let single = Entry::virtual_entry(title, &content);
        let view = PageView::new(DocumentTitle::new(single.title()), &single);
        Ok(render(site, view, status))
    }
}
