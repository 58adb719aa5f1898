//! Listing views: type collections, date archives and taxonomy terms.

use axum::http::StatusCode;
use chrono::NaiveDate;

use crate::content::Entry;
use crate::controllers::{
    listing_args, render, strip_page, Controller, ControllerResult, ERROR_404,
};
use crate::routing::Params;
use crate::site::Site;
use crate::view::{DocumentTitle, PageView, Pagination};

/// Paged list of a type's entries, headed by the type's `index` entry.
#[derive(Debug, Default)]
pub struct Collection;

impl Controller for Collection {
    fn handle(&self, params: &Params, site: &Site) -> ControllerResult {
        let page = params.page();
        let path = strip_page(params.path(), page);
        let Some(ty) = site.types().type_from_path_or_uri(path) else {
            return site.forward(ERROR_404, params);
        };

        let query = site.query();
        let single = query.single(ty.path(), "index")?;
        let collect = ty.collect().unwrap_or(ty.name());
        let args = listing_args(site, ty.collection_args(), Some(collect), single.as_ref(), page);
        let collection = query.collect(&args)?;

        match single.filter(|_| collection.has_entries()) {
            Some(single) => {
                let pagination = Pagination::new(path, page, collection.pages());
                let view = PageView::new(DocumentTitle::new(single.title()).page(page), &single)
                    .collection(Some(&collection))
                    .pagination(&pagination);
                Ok(render(site, view, StatusCode::OK))
            }
            None => site.forward(ERROR_404, params),
        }
    }
}

/// Entries of a type published within a year, month, day, hour, minute or second.
#[derive(Debug, Default)]
pub struct Archive;

/// Date parts taken from archive params.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ArchiveDate {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub hour: Option<u32>,
    pub minute: Option<u32>,
    pub second: Option<u32>,
}

impl ArchiveDate {
    /// `None` when a present param is not a number.
    pub fn from_params(params: &Params) -> Option<Self> {
        fn part<T: std::str::FromStr>(params: &Params, name: &str) -> Option<Option<T>> {
            match params.get(name) {
                Some(raw) => raw.parse().ok().map(Some),
                None => Some(None),
            }
        }
        Some(Self {
            year: part(params, "year")?,
            month: part(params, "month")?,
            day: part(params, "day")?,
            hour: part(params, "hour")?,
            minute: part(params, "minute")?,
            second: part(params, "second")?,
        })
    }

    /// Heading such as `March 2024` or `March 5, 2024 @ 10:30`.
    pub fn title(&self) -> String {
        let Some(year) = self.year else {
            return "Archives".to_string();
        };
        let Some(month) = self.month else {
            return year.to_string();
        };
        let Some(date) = NaiveDate::from_ymd_opt(year, month, self.day.unwrap_or(1)) else {
            return "Archives".to_string();
        };
        if self.day.is_none() {
            return date.format("%B %Y").to_string();
        }

        let day = date.format("%B %-d, %Y").to_string();
        match (self.hour, self.minute, self.second) {
            (Some(h), Some(m), Some(s)) => format!("{day} @ {h:02}:{m:02}:{s:02}"),
            (Some(h), Some(m), None) => format!("{day} @ {h:02}:{m:02}"),
            (Some(h), None, _) => format!("{day} @ {h:02}"),
            _ => day,
        }
    }
}

impl Controller for Archive {
    fn handle(&self, params: &Params, site: &Site) -> ControllerResult {
        let page = params.page();
        let basepath = strip_page(params.path(), page);
        let (Some(ty), Some(date)) = (
            site.types().resolve(basepath),
            ArchiveDate::from_params(params),
        ) else {
            return site.forward(ERROR_404, params);
        };

        let mut args = listing_args(site, ty.collection_args(), ty.collect(), None, page);
        if args.path.is_none() {
            args.path = Some(ty.path().to_string());
        }
        args.year = date.year.or(args.year);
        args.month = date.month.or(args.month);
        args.day = date.day.or(args.day);
        args.hour = date.hour.or(args.hour);
        args.minute = date.minute.or(args.minute);
        args.second = date.second.or(args.second);

        let collection = site.query().collect(&args)?;
        if !collection.has_entries() {
            return site.forward(ERROR_404, params);
        }

        let single = Entry::virtual_entry(&date.title(), "");
        let pagination = Pagination::new(basepath, page, collection.pages());
        let view = PageView::new(DocumentTitle::new(single.title()).page(page), &single)
            .collection(Some(&collection))
            .pagination(&pagination);
        Ok(render(site, view, StatusCode::OK))
    }
}

/// A taxonomy term and the entries tagged with it.
///
/// Entries carry terms in front matter under the taxonomy's name, e.g.
/// `tag: [rust, web]` for a taxonomy named `tag`.
#[derive(Debug, Default)]
pub struct Taxonomy;

impl Controller for Taxonomy {
    fn handle(&self, params: &Params, site: &Site) -> ControllerResult {
        let Some(name) = params.get("name") else {
            return site.forward(ERROR_404, params);
        };
        let page = params.page();
        let path = strip_page(params.path(), page);
        let type_path = path
            .strip_suffix(name)
            .map(|p| p.trim_end_matches('/'))
            .unwrap_or(path);
        let Some(ty) = site.types().type_from_path_or_uri(type_path) else {
            return site.forward(ERROR_404, params);
        };

        let query = site.query();
        let single = query.single(ty.path(), name)?;
        let mut args = listing_args(
            site,
            ty.term_collection_args(),
            ty.term_collect(),
            single.as_ref(),
            page,
        );
        args.meta_key = Some(ty.name().to_string());
        args.meta_value = Some(name.to_string());
        let collection = query.collect(&args)?;

        match single.filter(|s| s.is_public() && collection.has_entries()) {
            Some(single) => {
                let pagination = Pagination::new(path, page, collection.pages());
                let view = PageView::new(DocumentTitle::new(single.title()).page(page), &single)
                    .collection(Some(&collection))
                    .pagination(&pagination);
                Ok(render(site, view, StatusCode::OK))
            }
            None => site.forward(ERROR_404, params),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_archive_titles() {
        let date = |p: &[(&str, &str)]| ArchiveDate::from_params(&params(p)).unwrap().title();
        assert_eq!(date(&[("year", "2024")]), "2024");
        assert_eq!(date(&[("year", "2024"), ("month", "03")]), "March 2024");
        assert_eq!(
            date(&[("year", "2024"), ("month", "03"), ("day", "05")]),
            "March 5, 2024"
        );
        assert_eq!(
            date(&[("year", "2024"), ("month", "03"), ("day", "05"), ("hour", "9"), ("minute", "7")]),
            "March 5, 2024 @ 09:07"
        );
        assert_eq!(date(&[]), "Archives");
        assert_eq!(date(&[("year", "2024"), ("month", "13")]), "Archives");
    }

    #[test]
    fn test_archive_rejects_non_numbers() {
        assert!(ArchiveDate::from_params(&params(&[("year", "abcd")])).is_none());
    }
}
