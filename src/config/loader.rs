//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::SiteConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration text.
pub fn parse_config(content: &str) -> Result<SiteConfig, ConfigError> {
    let config: SiteConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.app.url, "http://localhost:8080");
        assert_eq!(config.paths.content_dir, "content");
        assert_eq!(config.timeouts.request_secs, 30);
        assert!(config.content.is_empty());
    }

    #[test]
    fn test_full_config() {
        let config = parse_config(
            r#"
            [app]
            url = "https://example.com"
            title = "Example"
            home_alias = "post"
            sitemap = true

            [[content]]
            name = "post"
            path = "_posts"
            uri = "blog"
            feed = true
            date_archives = true
            collection = { number = 5 }

            [[content]]
            name = "tag"
            path = "tags"
            taxonomy = true
            term_collect = "post"

            [[routes]]
            uri = "docs/{section}/{name}"
            controller = "single"
            where = { section = "[a-z]+" }

            [cache]
            global = true
            purge_key = "secret"
            stores = [{ name = "global" }, { name = "scratch", driver = "memory" }]
            "#,
        )
        .unwrap();

        assert_eq!(config.content.len(), 2);
        assert_eq!(config.content[0].options.uri.as_deref(), Some("blog"));
        assert_eq!(config.content[0].options.collection.number, Some(5));
        assert!(config.content[1].options.taxonomy);
        assert_eq!(config.routes[0].wheres["section"], "[a-z]+");
        assert_eq!(config.cache.stores[0].driver, "json");
        assert_eq!(config.cache.stores[1].driver, "memory");
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            parse_config("[app\nurl = 1"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_validation_error_surfaces() {
        let err = parse_config("[app]\nurl = \"not a url\"").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("app.url"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config(Path::new("/nonexistent/folio.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
