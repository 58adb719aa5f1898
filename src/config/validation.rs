//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (routes reference known controllers,
//!   content types reference existing types)
//! - Compile every configured route template
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SiteConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use crate::config::schema::SiteConfig;
use crate::content::types::{PAGE_TYPE, VIRTUAL_TYPE};
use crate::controllers::CONTROLLER_KEYS;
use crate::routing::pattern::compile;

/// Cache drivers available without registering a custom one.
pub const CACHE_DRIVERS: &[&str] = &["json", "memory"];

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("app.url `{0}` is not an absolute http(s) URL")]
    InvalidSiteUrl(String),

    #[error("listener.bind_address `{0}` is not a socket address")]
    InvalidBindAddress(String),

    #[error("content type at position {0} has an empty name")]
    EmptyTypeName(usize),

    #[error("content type `{0}` is defined more than once")]
    DuplicateType(String),

    #[error("`{field}` of content type `{owner}` names unknown type `{target}`")]
    UnknownTypeReference {
        owner: String,
        field: &'static str,
        target: String,
    },

    #[error("app.home_alias names unknown content type `{0}`")]
    UnknownHomeAlias(String),

    #[error("route `{uri}` uses unknown controller `{controller}`")]
    UnknownController { uri: String, controller: String },

    #[error("route `{uri}` is invalid: {reason}")]
    InvalidRoute { uri: String, reason: String },

    #[error("cache store `{store}` uses unknown driver `{driver}`")]
    UnknownCacheDriver { store: String, driver: String },

    #[error("cache store `{0}` is defined more than once")]
    DuplicateCacheStore(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("observability.log_level `{0}` is not one of trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("observability.metrics_address `{0}` is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &SiteConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match url::Url::parse(&config.app.url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => errors.push(ValidationError::InvalidSiteUrl(config.app.url.clone())),
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    validate_content(config, &mut errors);
    validate_routes(config, &mut errors);

    let mut stores = HashSet::new();
    for store in &config.cache.stores {
        if !stores.insert(store.name.as_str()) {
            errors.push(ValidationError::DuplicateCacheStore(store.name.clone()));
        }
        if !CACHE_DRIVERS.contains(&store.driver.as_str()) {
            errors.push(ValidationError::UnknownCacheDriver {
                store: store.name.clone(),
                driver: store.driver.clone(),
            });
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }
    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_content(config: &SiteConfig, errors: &mut Vec<ValidationError>) {
    let mut names: HashSet<&str> = HashSet::new();
    for (i, ty) in config.content.iter().enumerate() {
        if ty.name.trim().is_empty() {
            errors.push(ValidationError::EmptyTypeName(i));
        } else if !names.insert(ty.name.as_str()) {
            errors.push(ValidationError::DuplicateType(ty.name.clone()));
        }
    }
    names.insert(PAGE_TYPE);
    names.insert(VIRTUAL_TYPE);

    for ty in &config.content {
        let references = [
            ("collect", ty.options.collect.as_deref()),
            ("term_collect", ty.options.term_collect.as_deref()),
        ];
        for (field, target) in references {
            if let Some(target) = target.filter(|t| !names.contains(t)) {
                errors.push(ValidationError::UnknownTypeReference {
                    owner: ty.name.clone(),
                    field,
                    target: target.to_string(),
                });
            }
        }
    }

    let alias = config.app.home_alias.as_str();
    if !alias.is_empty() && !names.contains(alias) {
        errors.push(ValidationError::UnknownHomeAlias(alias.to_string()));
    }
}

fn validate_routes(config: &SiteConfig, errors: &mut Vec<ValidationError>) {
    for route in &config.routes {
        if !CONTROLLER_KEYS.contains(&route.controller.as_str()) {
            errors.push(ValidationError::UnknownController {
                uri: route.uri.clone(),
                controller: route.controller.clone(),
            });
        }
        match compile(route.uri.trim_matches('/'), &route.wheres) {
            Ok(pattern) => {
                if let Some(reason) = pattern.error() {
                    errors.push(ValidationError::InvalidRoute {
                        uri: route.uri.clone(),
                        reason: reason.to_string(),
                    });
                }
            }
            Err(e) => errors.push(ValidationError::InvalidRoute {
                uri: route.uri.clone(),
                reason: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{
        CacheStoreConfig, ContentTypeConfig, ContentTypeOptions, RouteConfig,
    };
    use std::collections::HashMap;

    fn content_type(name: &str) -> ContentTypeConfig {
        ContentTypeConfig {
            name: name.to_string(),
            options: ContentTypeOptions {
                path: name.to_string(),
                ..ContentTypeOptions::default()
            },
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&SiteConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = SiteConfig::default();
        config.app.url = "ftp://example.com".into();
        config.timeouts.request_secs = 0;
        config.content = vec![content_type("post"), content_type("post")];
        config.cache.stores.push(CacheStoreConfig {
            name: "x".into(),
            driver: "redis".into(),
        });

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::ZeroTimeout));
        assert!(errors.contains(&ValidationError::DuplicateType("post".into())));
    }

    #[test]
    fn test_type_references() {
        let mut config = SiteConfig::default();
        let mut tag = content_type("tag");
        tag.options.taxonomy = true;
        tag.options.term_collect = Some("post".into());
        config.content = vec![tag];
        config.app.home_alias = "blog".into();

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::UnknownHomeAlias("blog".into())));
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::UnknownTypeReference { field: "term_collect", .. }
        )));

        config.content.push(content_type("post"));
        config.app.home_alias = PAGE_TYPE.into();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_route_checks() {
        let mut config = SiteConfig::default();
        config.routes = vec![
            RouteConfig {
                uri: "docs/{name}".into(),
                name: None,
                controller: "render".into(),
                wheres: HashMap::new(),
            },
            RouteConfig {
                uri: "a/{id}".into(),
                name: None,
                controller: "single".into(),
                wheres: HashMap::from([("id".to_string(), "([".to_string())]),
            },
            RouteConfig {
                uri: "b/{id".into(),
                name: None,
                controller: "single".into(),
                wheres: HashMap::new(),
            },
        ];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(matches!(errors[0], ValidationError::UnknownController { .. }));
        assert!(matches!(errors[1], ValidationError::InvalidRoute { .. }));
        assert!(matches!(errors[2], ValidationError::InvalidRoute { .. }));
    }
}
