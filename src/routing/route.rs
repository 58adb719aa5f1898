//! A single route: URI template bound to a controller key.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::routing::pattern::{self, CompiledPattern, PatternError, WherePreset};

/// Options accepted when registering a route.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct RouteOptions {
    /// Route name; defaults to the URI.
    #[serde(default)]
    pub name: Option<String>,

    /// Controller registry key.
    pub controller: String,

    /// Per-placeholder regex overrides.
    #[serde(default, rename = "where")]
    pub wheres: HashMap<String, String>,
}

impl RouteOptions {
    pub fn new(controller: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            ..Self::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Constrain `param` with a raw regex.
    pub fn where_regex(mut self, param: &str, regex: impl Into<String>) -> Self {
        self.wheres.insert(param.to_string(), regex.into());
        self
    }

    /// Constrain each of `params` with a preset.
    pub fn where_preset(mut self, params: &[&str], preset: WherePreset) -> Self {
        for param in params {
            self.wheres.insert(param.to_string(), preset.regex().to_string());
        }
        self
    }

    pub fn where_number(self, params: &[&str]) -> Self {
        self.where_preset(params, WherePreset::Number)
    }

    pub fn where_alpha(self, params: &[&str]) -> Self {
        self.where_preset(params, WherePreset::Alpha)
    }

    pub fn where_alpha_numeric(self, params: &[&str]) -> Self {
        self.where_preset(params, WherePreset::AlphaNumeric)
    }

    pub fn where_slug(self, params: &[&str]) -> Self {
        self.where_preset(params, WherePreset::Slug)
    }

    pub fn where_year(self, params: &[&str]) -> Self {
        self.where_preset(params, WherePreset::Year)
    }

    pub fn where_month(self, params: &[&str]) -> Self {
        self.where_preset(params, WherePreset::Month)
    }

    pub fn where_day(self, params: &[&str]) -> Self {
        self.where_preset(params, WherePreset::Day)
    }
}

/// A registered route. Immutable once built.
#[derive(Debug, Clone)]
pub struct Route {
    uri: String,
    name: String,
    controller: String,
    wheres: HashMap<String, String>,
    pattern: CompiledPattern,
}

impl Route {
    /// Build a route and compile its pattern.
    pub fn new(uri: impl Into<String>, options: RouteOptions) -> Result<Self, PatternError> {
        let uri = uri.into();
        let pattern = pattern::compile(&uri, &options.wheres)?;
        Ok(Self {
            name: options.name.unwrap_or_else(|| uri.clone()),
            uri,
            controller: options.controller,
            wheres: options.wheres,
            pattern,
        })
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn controller(&self) -> &str {
        &self.controller
    }

    pub fn wheres(&self) -> &HashMap<String, String> {
        &self.wheres
    }

    pub fn has_where(&self, param: &str) -> bool {
        self.wheres.contains_key(param)
    }

    pub fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }

    /// Placeholder names in template order.
    pub fn parameters(&self) -> &[String] {
        self.pattern.parameters()
    }

    pub fn has_parameters(&self) -> bool {
        !self.pattern.parameters().is_empty()
    }
}
