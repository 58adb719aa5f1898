//! The built-in HTML layout every page view renders through.

use crate::content::markdown::escape;
use crate::content::{Collection, Entry};
use crate::site::Site;
use crate::view::pagination::Pagination;
use crate::view::title::DocumentTitle;

/// Everything a controller hands to the layout.
#[derive(Debug)]
pub struct PageView<'a> {
    pub doctitle: DocumentTitle,
    pub single: &'a Entry,
    pub collection: Option<&'a Collection>,
    pub pagination: Option<&'a Pagination>,
}

impl<'a> PageView<'a> {
    pub fn new(doctitle: DocumentTitle, single: &'a Entry) -> Self {
        Self {
            doctitle,
            single,
            collection: None,
            pagination: None,
        }
    }

    pub fn collection(mut self, collection: Option<&'a Collection>) -> Self {
        self.collection = collection;
        self
    }

    pub fn pagination(mut self, pagination: &'a Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn render(&self, site: &Site) -> String {
        let app = &site.config().app;
        let url = site.url();
        let mut html = String::with_capacity(4096);

        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
        html.push_str(&self.doctitle.render(&app.title, &app.tagline));
        html.push('\n');
        if site.types().get(&app.home_alias).is_some_and(|t| t.has_feed()) {
            html.push_str(&format!(
                "<link rel=\"alternate\" type=\"application/atom+xml\" title=\"{}\" href=\"{}\">\n",
                escape(&app.title),
                escape(&url.to("feed"))
            ));
        }
        html.push_str("</head>\n<body>\n");

        html.push_str(&format!(
            "<header class=\"site-header\"><a class=\"site-title\" href=\"{}\">{}</a>",
            escape(&url.to("/")),
            escape(&app.title)
        ));
        if !app.tagline.is_empty() {
            html.push_str(&format!("<p class=\"site-tagline\">{}</p>", escape(&app.tagline)));
        }
        html.push_str("</header>\n<main>\n");

        html.push_str(&format!(
            "<article class=\"entry\">\n<h1 class=\"entry-title\">{}</h1>\n",
            escape(self.single.title())
        ));
        if let Some(date) = self.single.date() {
            html.push_str(&format!(
                "<time datetime=\"{}\">{}</time>\n",
                date.format("%Y-%m-%dT%H:%M:%S"),
                date.format("%B %-d, %Y")
            ));
        }
        html.push_str(&self.single.html(url));
        html.push_str("\n</article>\n");

        if let Some(collection) = self.collection.filter(|c| c.has_entries()) {
            html.push_str("<section class=\"collection\">\n<ul>\n");
            for entry in collection.entries() {
                html.push_str(&format!(
                    "<li><a href=\"{}\">{}</a>",
                    escape(&site.entry_url(entry)),
                    escape(entry.title())
                ));
                if let Some(date) = entry.date() {
                    html.push_str(&format!(" <time>{}</time>", date.format("%Y-%m-%d")));
                }
                html.push_str("</li>\n");
            }
            html.push_str("</ul>\n</section>\n");
        }

        if let Some(pagination) = self.pagination {
            html.push_str(&pagination.render(url));
        }

        html.push_str("</main>\n</body>\n</html>\n");
        html
    }
}
