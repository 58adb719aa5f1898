//! Atom 1.0 feed documents.

use chrono::{NaiveDateTime, SecondsFormat, Utc};

use crate::content::markdown::escape;
use crate::content::{Collection, Entry};
use crate::site::Site;

fn rfc3339(date: NaiveDateTime) -> String {
    date.and_utc().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Atom feed for a collection. `single` supplies the feed title and
/// `self_path` is the feed's own site path.
pub fn atom(site: &Site, single: &Entry, collection: &Collection, self_path: &str) -> String {
    let url = site.url();
    let feed_url = escape(&url.to(self_path));
    let updated = collection
        .entries()
        .iter()
        .filter_map(Entry::date)
        .max()
        .map(rfc3339)
        .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));

    let title = if single.slug() == "index" && single.dir().is_empty() {
        site.config().app.title.clone()
    } else {
        format!("{} - {}", single.title(), site.config().app.title)
    };

    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    xml.push_str("<feed xmlns=\"http://www.w3.org/2005/Atom\">\n");
    xml.push_str(&format!("<title>{}</title>\n", escape(&title)));
    if !site.config().app.tagline.is_empty() {
        xml.push_str(&format!(
            "<subtitle>{}</subtitle>\n",
            escape(&site.config().app.tagline)
        ));
    }
    xml.push_str(&format!("<link href=\"{}\"/>\n", escape(&url.to("/"))));
    xml.push_str(&format!("<link rel=\"self\" href=\"{feed_url}\"/>\n"));
    xml.push_str(&format!("<id>{feed_url}</id>\n"));
    xml.push_str(&format!("<updated>{updated}</updated>\n"));

    for entry in collection.entries() {
        let link = escape(&site.entry_url(entry));
        let entry_updated = entry.date().map(rfc3339).unwrap_or_else(|| updated.clone());
        xml.push_str("<entry>\n");
        xml.push_str(&format!("<title>{}</title>\n", escape(entry.title())));
        xml.push_str(&format!("<link href=\"{link}\"/>\n"));
        xml.push_str(&format!("<id>{link}</id>\n"));
        xml.push_str(&format!("<updated>{entry_updated}</updated>\n"));
        if let Some(author) = entry.author() {
            xml.push_str(&format!("<author><name>{}</name></author>\n", escape(author)));
        }
        xml.push_str(&format!(
            "<content type=\"html\">{}</content>\n",
            escape(&entry.html(url))
        ));
        xml.push_str("</entry>\n");
    }

    xml.push_str("</feed>\n");
    xml
}
