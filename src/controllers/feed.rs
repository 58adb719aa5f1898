//! Atom feeds for collections.

use crate::controllers::{listing_args, Controller, ControllerResult, ERROR_404};
use crate::http::response::{self, ATOM};
use crate::routing::Params;
use crate::site::Site;
use crate::view::feed;

/// The newest entries of a type as Atom. `feed` alone serves the home alias type.
#[derive(Debug, Default)]
pub struct FeedAtom;

impl Controller for FeedAtom {
    fn handle(&self, params: &Params, site: &Site) -> ControllerResult {
        let path = params.path().trim_matches('/');
        let type_path = path
            .strip_suffix("feed")
            .unwrap_or(path)
            .trim_matches('/');

        let ty = if type_path.is_empty() {
            let alias = site.config().app.home_alias.as_str();
            site.types().get(alias).filter(|_| !alias.is_empty())
        } else {
            site.types().type_from_path_or_uri(type_path)
        };
        let Some(ty) = ty else {
            return site.forward(ERROR_404, params);
        };

        let query = site.query();
        let single = query.single(ty.path(), "index")?;
        let collect = ty.collect().unwrap_or(ty.name());
        let args = listing_args(site, ty.collection_args(), Some(collect), None, 1);
        let collection = query.collect(&args)?;

        match single.filter(|_| collection.has_entries()) {
            Some(single) => Ok(response::xml(
                ATOM,
                feed::atom(site, &single, &collection, path),
            )),
            None => site.forward(ERROR_404, params),
        }
    }
}
