//! URI template compilation.
//!
//! # Responsibilities
//! - Split a template like `blog/{year}/{slug}` into literals and placeholders
//! - Build an anchored regex with one capture group per placeholder
//! - Record placeholder names in left-to-right order
//!
//! # Design Decisions
//! - Each placeholder is wrapped in a synthetic named group (`p0`, `p1`, ...)
//!   so where-clauses containing their own groups cannot shift positions
//! - An invalid where regex yields a broken pattern instead of an error;
//!   broken patterns never match

use regex::Regex;
use std::collections::HashMap;

/// Default pattern for a placeholder with no where-clause.
pub const DEFAULT_SEGMENT: &str = "[^/]+";

/// Built-in regex presets for where-clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WherePreset {
    Number,
    Alpha,
    AlphaNumeric,
    Slug,
    Year,
    Month,
    Day,
}

impl WherePreset {
    /// Regex source for this preset.
    pub fn regex(self) -> &'static str {
        match self {
            WherePreset::Number => "[0-9]+",
            WherePreset::Alpha => "[a-zA-Z]+",
            WherePreset::AlphaNumeric => "[a-zA-Z0-9]+",
            WherePreset::Slug => "[a-zA-Z0-9_-]+",
            WherePreset::Year => "[0-9]{4}",
            WherePreset::Month | WherePreset::Day => "[0-9]{2}",
        }
    }
}

/// Patterns applied to well-known placeholder names when no where-clause is set.
fn builtin_pattern(name: &str) -> Option<&'static str> {
    match name {
        "page" => Some(WherePreset::Number.regex()),
        "year" => Some(WherePreset::Year.regex()),
        "month" => Some(WherePreset::Month.regex()),
        "day" => Some(WherePreset::Day.regex()),
        "hour" | "minute" | "second" => Some("[0-9]{2}"),
        "*" => Some(".*"),
        _ => None,
    }
}

/// Structural problems with a template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("unclosed placeholder in `{0}`")]
    Unclosed(String),

    #[error("empty placeholder name in `{0}`")]
    EmptyName(String),

    #[error("placeholder `{name}` appears twice in `{template}`")]
    Duplicate { template: String, name: String },

    #[error("where-clause names `{name}`, which is not a placeholder in `{template}`")]
    UnknownParameter { template: String, name: String },
}

/// A compiled template.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    regex: Option<Regex>,
    error: Option<String>,
    parameters: Vec<String>,
}

impl CompiledPattern {
    /// Regex source the template compiled to.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Placeholder names in template order.
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// The regex compile error, if the pattern is broken.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_broken(&self) -> bool {
        self.regex.is_none()
    }

    /// Match `path` and return captured values in placeholder order.
    pub fn captures(&self, path: &str) -> Option<Vec<String>> {
        let caps = self.regex.as_ref()?.captures(path)?;
        let values = (0..self.parameters.len())
            .map(|i| {
                caps.name(&format!("p{i}"))
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default()
            })
            .collect();
        Some(values)
    }
}

enum Segment<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

fn tokenize(template: &str) -> Result<Vec<Segment<'_>>, PatternError> {
    let mut segments = Vec::new();
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        if open > 0 {
            segments.push(Segment::Literal(&rest[..open]));
        }
        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| PatternError::Unclosed(template.to_string()))?;
        let name = after[..close].trim();
        if name.is_empty() {
            return Err(PatternError::EmptyName(template.to_string()));
        }
        segments.push(Segment::Placeholder(name));
        rest = &after[close + 1..];
    }
    if !rest.is_empty() {
        segments.push(Segment::Literal(rest));
    }
    Ok(segments)
}

/// Compile `template` with the given where-clauses.
pub fn compile(
    template: &str,
    wheres: &HashMap<String, String>,
) -> Result<CompiledPattern, PatternError> {
    let segments = tokenize(template)?;
    let mut parameters: Vec<String> = Vec::new();
    let mut source = String::from("^");

    for segment in &segments {
        match segment {
            Segment::Literal(text) => source.push_str(&regex::escape(text)),
            Segment::Placeholder(name) => {
                if parameters.iter().any(|p| p == name) {
                    return Err(PatternError::Duplicate {
                        template: template.to_string(),
                        name: name.to_string(),
                    });
                }
                let inner = wheres
                    .get(*name)
                    .map(String::as_str)
                    .or_else(|| builtin_pattern(name))
                    .unwrap_or(DEFAULT_SEGMENT);
                source.push_str(&format!("(?P<p{}>{})", parameters.len(), inner));
                parameters.push(name.to_string());
            }
        }
    }
    source.push('$');

    if let Some(name) = wheres.keys().find(|w| !parameters.contains(w)) {
        return Err(PatternError::UnknownParameter {
            template: template.to_string(),
            name: name.clone(),
        });
    }

    let (regex, error) = match Regex::new(&source) {
        Ok(re) => (Some(re), None),
        Err(e) => {
            tracing::warn!(template = %template, error = %e, "Route pattern failed to compile");
            (None, Some(e.to_string()))
        }
    };

    Ok(CompiledPattern {
        source,
        regex,
        error,
        parameters,
    })
}
