//! Markdown content entries with YAML front matter.

use chrono::{NaiveDate, NaiveDateTime};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::content::markdown;
use crate::content::query::QueryArgs;
use crate::content::ContentError;
use crate::routing::UrlBuilder;

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// A content entry.
#[derive(Debug, Clone)]
pub struct Entry {
    dir: String,
    slug: String,
    meta: BTreeMap<String, Value>,
    body: String,
    file: Option<PathBuf>,
}

impl Entry {
    /// Parse raw file contents.
    pub fn parse(dir: &str, slug: &str, raw: &str, file: &Path) -> Result<Self, ContentError> {
        let (front, body) = split_front_matter(raw);
        let meta = match front.map(str::trim) {
            Some(yaml) if !yaml.is_empty() => {
                serde_yaml::from_str(yaml).map_err(|source| ContentError::FrontMatter {
                    path: file.to_path_buf(),
                    source,
                })?
            }
            _ => BTreeMap::new(),
        };

        Ok(Self {
            dir: dir.trim_matches('/').to_string(),
            slug: slug.to_string(),
            meta,
            body: body.to_string(),
            file: Some(file.to_path_buf()),
        })
    }

    /// An entry that exists only in memory, e.g. an archive heading or error page.
    pub fn virtual_entry(title: &str, html: &str) -> Self {
        let mut meta = BTreeMap::new();
        meta.insert("title".to_string(), Value::String(title.to_string()));
        Self {
            dir: String::new(),
            slug: String::new(),
            meta,
            body: html.to_string(),
            file: None,
        }
    }

    /// Directory relative to the content root.
    pub fn dir(&self) -> &str {
        &self.dir
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn is_virtual(&self) -> bool {
        self.file.is_none()
    }

    pub fn title(&self) -> &str {
        self.meta_str("title").unwrap_or(&self.slug)
    }

    pub fn author(&self) -> Option<&str> {
        self.meta_str("author")
    }

    pub fn date(&self) -> Option<NaiveDateTime> {
        let raw = self.meta_str("date")?.trim();
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
    }

    /// Hidden when the slug starts with `_` or front matter sets `public: false`.
    pub fn is_public(&self) -> bool {
        !self.slug.starts_with('_') && self.meta.get("public").and_then(Value::as_bool) != Some(false)
    }

    pub fn has_meta(&self, key: &str) -> bool {
        self.meta.contains_key(key)
    }

    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.meta.get(key).and_then(Value::as_str)
    }

    /// A meta value as a list of strings; scalars become one-element lists.
    pub fn meta_values(&self, key: &str) -> Vec<String> {
        match self.meta.get(key) {
            Some(Value::Sequence(items)) => items.iter().filter_map(scalar_to_string).collect(),
            Some(value) => scalar_to_string(value).into_iter().collect(),
            None => Vec::new(),
        }
    }

    /// Query overrides from the `collection` front matter table.
    pub fn collection_args(&self) -> Option<QueryArgs> {
        let value = self.meta.get("collection")?;
        match serde_yaml::from_value(value.clone()) {
            Ok(args) => Some(args),
            Err(e) => {
                tracing::warn!(slug = %self.slug, error = %e, "Ignoring invalid collection args");
                None
            }
        }
    }

    /// Rendered body. Virtual entries already hold HTML.
    pub fn html(&self, url: &UrlBuilder) -> String {
        if self.is_virtual() {
            self.body.clone()
        } else {
            markdown::render(&self.body, url)
        }
    }

    /// Content-relative location, e.g. `posts/hello`.
    pub fn location(&self) -> String {
        if self.dir.is_empty() {
            self.slug.clone()
        } else {
            format!("{}/{}", self.dir, self.slug)
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Split `---` fenced front matter from the body.
fn split_front_matter(raw: &str) -> (Option<&str>, &str) {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let Some(rest) = raw
        .strip_prefix("---\n")
        .or_else(|| raw.strip_prefix("---\r\n"))
    else {
        return (None, raw);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return (Some(&rest[..offset]), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }
    (None, raw)
}
