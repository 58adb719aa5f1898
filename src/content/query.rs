//! Collection queries over the content tree.

use chrono::{Datelike, Timelike};
use serde::{Deserialize, Serialize};

use crate::content::entry::Entry;
use crate::content::locator::ContentLocator;
use crate::content::ContentError;

/// Entries per page when a query does not set `number`.
pub const DEFAULT_PER_PAGE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderBy {
    Date,
    Title,
    Slug,
}

/// Query arguments. Unset fields fall back to defaults at query time.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct QueryArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orderby: Option<OrderBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hour: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minute: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_value: Option<String>,
}

impl QueryArgs {
    /// Fields set in `over` replace fields in `self`.
    pub fn merge(&self, over: &QueryArgs) -> QueryArgs {
        QueryArgs {
            path: over.path.clone().or_else(|| self.path.clone()),
            slug: over.slug.clone().or_else(|| self.slug.clone()),
            number: over.number.or(self.number),
            offset: over.offset.or(self.offset),
            order: over.order.or(self.order),
            orderby: over.orderby.or(self.orderby),
            year: over.year.or(self.year),
            month: over.month.or(self.month),
            day: over.day.or(self.day),
            hour: over.hour.or(self.hour),
            minute: over.minute.or(self.minute),
            second: over.second.or(self.second),
            meta_key: over.meta_key.clone().or_else(|| self.meta_key.clone()),
            meta_value: over.meta_value.clone().or_else(|| self.meta_value.clone()),
        }
    }

    pub fn per_page(&self) -> usize {
        self.number.filter(|&n| n > 0).unwrap_or(DEFAULT_PER_PAGE)
    }

    /// Set `number` and `offset` for a 1-based page.
    pub fn paginate(mut self, page: usize) -> Self {
        let per_page = self.per_page();
        self.number = Some(per_page);
        self.offset = Some(per_page.saturating_mul(page.saturating_sub(1)));
        self
    }

    fn has_date_filter(&self) -> bool {
        self.year.is_some()
            || self.month.is_some()
            || self.day.is_some()
            || self.hour.is_some()
            || self.minute.is_some()
            || self.second.is_some()
    }

    /// Whether an entry passes the date and meta filters.
    pub fn matches(&self, entry: &Entry) -> bool {
        if self.has_date_filter() {
            let Some(date) = entry.date() else {
                return false;
            };
            let checks = [
                self.year.map_or(true, |y| date.year() == y),
                self.month.map_or(true, |m| date.month() == m),
                self.day.map_or(true, |d| date.day() == d),
                self.hour.map_or(true, |h| date.hour() == h),
                self.minute.map_or(true, |m| date.minute() == m),
                self.second.map_or(true, |s| date.second() == s),
            ];
            if !checks.iter().all(|&ok| ok) {
                return false;
            }
        }

        match (&self.meta_key, &self.meta_value) {
            (Some(key), Some(value)) => entry.meta_values(key).iter().any(|v| v == value),
            (Some(key), None) => entry.has_meta(key),
            _ => true,
        }
    }

    fn accepts(&self, entry: &Entry) -> bool {
        entry.slug() != "index" && entry.is_public() && self.matches(entry)
    }
}

/// One page of query results.
#[derive(Debug, Clone)]
pub struct Collection {
    entries: Vec<Entry>,
    total: usize,
    per_page: usize,
}

impl Collection {
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Matching entries before pagination.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn pages(&self) -> usize {
        self.total.div_ceil(self.per_page)
    }

    pub fn has_entries(&self) -> bool {
        !self.entries.is_empty()
    }
}

/// Runs queries against a locator.
#[derive(Debug, Clone, Copy)]
pub struct Query<'a> {
    locator: &'a ContentLocator,
}

impl<'a> Query<'a> {
    pub fn new(locator: &'a ContentLocator) -> Self {
        Self { locator }
    }

    /// A single entry by directory and slug.
    pub fn single(&self, path: &str, slug: &str) -> Result<Option<Entry>, ContentError> {
        self.locator.find(path, slug)
    }

    /// Filtered, sorted and paginated entries.
    pub fn collect(&self, args: &QueryArgs) -> Result<Collection, ContentError> {
        let path = args.path.as_deref().unwrap_or_default();

        if let Some(slug) = &args.slug {
            let entries: Vec<Entry> = self.single(path, slug)?.into_iter().collect();
            return Ok(Collection {
                total: entries.len(),
                entries,
                per_page: args.per_page(),
            });
        }

        let mut entries: Vec<Entry> = self
            .locator
            .list(path)?
            .into_iter()
            .filter(|e| args.accepts(e))
            .collect();

        match args.orderby.unwrap_or(OrderBy::Date) {
            OrderBy::Date => entries.sort_by_key(|e| e.date()),
            OrderBy::Title => entries.sort_by_key(|e| e.title().to_lowercase()),
            OrderBy::Slug => entries.sort_by(|a, b| a.slug().cmp(b.slug())),
        }
        let default_order = match args.orderby {
            None | Some(OrderBy::Date) => Order::Desc,
            _ => Order::Asc,
        };
        if args.order.unwrap_or(default_order) == Order::Desc {
            entries.reverse();
        }

        let total = entries.len();
        let per_page = args.per_page();
        let entries = entries
            .into_iter()
            .skip(args.offset.unwrap_or(0))
            .take(per_page)
            .collect();

        Ok(Collection {
            entries,
            total,
            per_page,
        })
    }
}
