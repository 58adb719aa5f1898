//! The `<title>` of a rendered page.

use crate::content::markdown::escape;

const SEPARATOR: &str = " &mdash; ";

/// Document title for a view: view title, page number and site identity.
#[derive(Debug, Clone, Default)]
pub struct DocumentTitle {
    title: String,
    page: usize,
}

impl DocumentTitle {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            page: 1,
        }
    }

    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    /// Escaped title text.
    ///
    /// `View: Page 2 &mdash; Site` for titled paged views, `Site &mdash; Tagline` for the
    /// unpaged home view.
    pub fn build(&self, app_title: &str, tagline: &str) -> String {
        let paged = self.page >= 2;
        let mut items = Vec::with_capacity(2);

        let mut head = if self.title.is_empty() {
            escape(app_title)
        } else {
            escape(&self.title)
        };
        if paged {
            head.push_str(&format!(": Page {}", self.page));
        }
        items.push(head);

        if !self.title.is_empty() {
            items.push(escape(app_title));
        } else if !paged {
            items.push(escape(tagline));
        }

        items.retain(|s| !s.is_empty());
        items.join(SEPARATOR)
    }

    pub fn render(&self, app_title: &str, tagline: &str) -> String {
        format!("<title>{}</title>", self.build(app_title, tagline))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_title_has_tagline() {
        let t = DocumentTitle::default();
        assert_eq!(t.build("Folio", "Notes & more"), "Folio &mdash; Notes &amp; more");
    }

    #[test]
    fn test_view_title() {
        let t = DocumentTitle::new("Hello");
        assert_eq!(t.render("Folio", "x"), "<title>Hello &mdash; Folio</title>");
    }

    #[test]
    fn test_paged_titles() {
        assert_eq!(
            DocumentTitle::new("Blog").page(3).build("Folio", "x"),
            "Blog: Page 3 &mdash; Folio"
        );
        assert_eq!(
            DocumentTitle::default().page(2).build("Folio", "x"),
            "Folio: Page 2"
        );
    }

    #[test]
    fn test_empty_tagline_dropped() {
        assert_eq!(DocumentTitle::default().build("Folio", ""), "Folio");
    }
}
