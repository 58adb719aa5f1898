//! Numbered page links for collections.

use crate::content::markdown::escape;
use crate::routing::UrlBuilder;

/// Pagination state for a collection view.
#[derive(Debug, Clone)]
pub struct Pagination {
    basepath: String,
    current: usize,
    total: usize,
}

impl Pagination {
    /// `basepath` is the unpaged collection path, e.g. `blog` or `` for home.
    pub fn new(basepath: &str, current: usize, total: usize) -> Self {
        Self {
            basepath: basepath.trim_matches('/').to_string(),
            current: current.max(1),
            total,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn has_pages(&self) -> bool {
        self.total > 1
    }

    /// Site path of page `n`. Page 1 is the base path itself.
    pub fn path(&self, n: usize) -> String {
        match (n, self.basepath.is_empty()) {
            (1, _) => self.basepath.clone(),
            (_, true) => format!("page/{n}"),
            (_, false) => format!("{}/page/{n}", self.basepath),
        }
    }

    pub fn render(&self, url: &UrlBuilder) -> String {
        if !self.has_pages() {
            return String::new();
        }

        let mut html = String::from("<nav class=\"pagination\"><ul>");
        if self.current > 1 {
            html.push_str(&format!(
                "<li><a class=\"prev\" href=\"{}\">Previous</a></li>",
                escape(&url.to(&self.path(self.current - 1)))
            ));
        }
        for n in 1..=self.total {
            if n == self.current {
                html.push_str(&format!("<li><span aria-current=\"page\">{n}</span></li>"));
            } else {
                html.push_str(&format!("<li><a href=\"{}\">{n}</a></li>", escape(&url.to(&self.path(n)))));
            }
        }
        if self.current < self.total {
            html.push_str(&format!(
                "<li><a class=\"next\" href=\"{}\">Next</a></li>",
                escape(&url.to(&self.path(self.current + 1)))
            ));
        }
        html.push_str("</ul></nav>");
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let p = Pagination::new("/blog/", 2, 3);
        assert_eq!(p.path(1), "blog");
        assert_eq!(p.path(3), "blog/page/3");
        assert_eq!(Pagination::new("", 1, 2).path(2), "page/2");
    }

    #[test]
    fn test_render_links() {
        let url = UrlBuilder::new("https://example.com");
        let html = Pagination::new("blog", 2, 3).render(&url);
        assert!(html.contains("href=\"https://example.com/blog\">Previous"));
        assert!(html.contains("<span aria-current=\"page\">2</span>"));
        assert!(html.contains("href=\"https://example.com/blog/page/3\">Next"));
    }

    #[test]
    fn test_render_escapes_paths() {
        let url = UrlBuilder::new("https://example.com");
        let html = Pagination::new("a\"b&c", 1, 2).render(&url);
        assert!(html.contains("href=\"https://example.com/a&quot;b&amp;c/page/2\""));
    }

    #[test]
    fn test_single_page_renders_nothing() {
        let url = UrlBuilder::new("https://example.com");
        assert!(Pagination::new("blog", 1, 1).render(&url).is_empty());
    }
}
