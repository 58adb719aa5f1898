//! Markdown to HTML rendering.
//!
//! # Responsibilities
//! - Render CommonMark (plus tables and strikethrough) with pulldown-cmark
//! - Point root-relative link and image destinations at the site URL
//! - Leave lone images, or a link wrapping a lone image, unwrapped by `<p>`
//!
//! # Design Decisions
//! - Raw HTML in the source is escaped, never passed through
//! - `javascript:`, `vbscript:` and `data:` link destinations are dropped

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};

use crate::routing::UrlBuilder;

const UNSAFE_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:"];

/// Escape text for HTML element and attribute content.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render Markdown source to HTML. Destinations starting with a single `/`
/// are joined onto the site URL.
pub fn render(source: &str, url: &UrlBuilder) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let events: Vec<Event<'_>> = Parser::new_ext(source, options)
        .map(|event| rewrite(event, url))
        .collect();

    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, unwrap_lone_images(events).into_iter());
    out
}

fn rewrite<'a>(event: Event<'a>, url: &UrlBuilder) -> Event<'a> {
    match event {
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: destination(dest_url, url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: destination(dest_url, url),
            title,
            id,
        }),
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    }
}

fn destination<'a>(dest: CowStr<'a>, url: &UrlBuilder) -> CowStr<'a> {
    let lower = dest.trim_start().to_ascii_lowercase();
    if UNSAFE_SCHEMES.iter().any(|scheme| lower.starts_with(scheme)) {
        return CowStr::Borrowed("");
    }
    if dest.starts_with('/') && !dest.starts_with("//") {
        return CowStr::from(url.to(&dest));
    }
    dest
}

/// Drop the paragraph around a paragraph whose only content is an image,
/// or a link whose only content is an image.
fn unwrap_lone_images(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut out = Vec::with_capacity(events.len());
    let mut i = 0;
    while i < events.len() {
        if matches!(events[i], Event::Start(Tag::Paragraph)) {
            let end = events[i + 1..]
                .iter()
                .position(|e| matches!(e, Event::End(TagEnd::Paragraph)))
                .map(|offset| i + 1 + offset);
            if let Some(end) = end.filter(|&end| is_lone_image(&events[i + 1..end])) {
                out.extend(events[i + 1..end].iter().cloned());
                i = end + 1;
                continue;
            }
        }
        out.push(events[i].clone());
        i += 1;
    }
    out
}

fn is_lone_image(inner: &[Event<'_>]) -> bool {
    let inner = match (inner.first(), inner.last()) {
        (Some(Event::Start(Tag::Link { .. })), Some(Event::End(TagEnd::Link))) => {
            &inner[1..inner.len() - 1]
        }
        _ => inner,
    };
    matches!(
        (inner.first(), inner.last()),
        (Some(Event::Start(Tag::Image { .. })), Some(Event::End(TagEnd::Image)))
    ) && inner[1..inner.len() - 1]
        .iter()
        .all(|e| !matches!(e, Event::Start(Tag::Image { .. }) | Event::End(TagEnd::Image)))
}
