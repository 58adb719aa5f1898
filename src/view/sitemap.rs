//! XML sitemaps (sitemaps.org protocol 0.9).

use chrono::NaiveDateTime;

use crate::content::markdown::escape;

const XMLNS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// A `<urlset>` of absolute URLs with optional last-modified dates.
pub fn urlset<I>(urls: I) -> String
where
    I: IntoIterator<Item = (String, Option<NaiveDateTime>)>,
{
    let mut xml = format!("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<urlset xmlns=\"{XMLNS}\">\n");
    for (loc, lastmod) in urls {
        xml.push_str(&format!("<url><loc>{}</loc>", escape(&loc)));
        if let Some(date) = lastmod {
            xml.push_str(&format!("<lastmod>{}</lastmod>", date.format("%Y-%m-%d")));
        }
        xml.push_str("</url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

/// A `<sitemapindex>` pointing at per-type sitemaps.
pub fn index<I>(locations: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let mut xml =
        format!("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<sitemapindex xmlns=\"{XMLNS}\">\n");
    for loc in locations {
        xml.push_str(&format!("<sitemap><loc>{}</loc></sitemap>\n", escape(&loc)));
    }
    xml.push_str("</sitemapindex>\n");
    xml
}
