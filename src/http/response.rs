//! Response construction and the global response cache.
//!
//! # Responsibilities
//! - Build HTML and XML responses with the right content type
//! - Decide which paths the global cache may hold
//! - Convert between responses and cached entries
//!
//! # Design Decisions
//! - Only 200 responses are cached
//! - `feed` and `purge/cache` paths are never cached, nor any configured
//!   exclusion prefix
//! - Cached entries keep their content type so sitemaps and feeds are
//!   served back as XML

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

pub const HTML: &str = "text/html; charset=utf-8";
pub const ATOM: &str = "application/atom+xml; charset=utf-8";
pub const XML: &str = "application/xml; charset=utf-8";

/// Header reporting whether the global cache served the response.
pub const X_CACHE: &str = "x-cache";

/// Path prefixes that are never cached globally.
const ALWAYS_EXCLUDED: &[&str] = &["feed", "purge/cache"];

pub fn html(status: StatusCode, body: String) -> Response {
    with_type(status, HTML, body)
}

pub fn xml(content_type: &'static str, body: String) -> Response {
    with_type(StatusCode::OK, content_type, body)
}

fn with_type(status: StatusCode, content_type: &'static str, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, content_type)], body).into_response()
}

/// Plain 500 page for failures that escape a controller.
pub fn internal_error() -> Response {
    html(
        StatusCode::INTERNAL_SERVER_ERROR,
        "<!DOCTYPE html><title>Internal Server Error</title><h1>Internal Server Error</h1>"
            .to_string(),
    )
}

/// Cache key for a request path: `/` is `index`, separators become dots.
pub fn global_cache_key(path: &str) -> String {
    let path = path.trim_matches('/');
    if path.is_empty() {
        "index".to_string()
    } else {
        path.replace(['/', '\\'], ".")
    }
}

/// Whether a request path may be served from and stored in the global cache.
pub fn is_cacheable(path: &str, exclude: &[String]) -> bool {
    let path = path.trim_matches('/');
    let excluded = ALWAYS_EXCLUDED
        .iter()
        .copied()
        .chain(exclude.iter().map(|e| e.trim_matches('/')))
        .filter(|prefix| !prefix.is_empty())
        .any(|prefix| path.starts_with(prefix));
    !excluded
}

/// A response body as held in the `global` store.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CachedResponse {
    pub content_type: String,
    pub body: String,
}

impl CachedResponse {
    pub fn new(content_type: &str, body: String) -> Self {
        Self {
            content_type: content_type.to_string(),
            body,
        }
    }

    /// Rebuild a 200 response marked as a cache hit.
    pub fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        let headers = response.headers_mut();
        let content_type =
            HeaderValue::from_str(&self.content_type).unwrap_or(HeaderValue::from_static(HTML));
        headers.insert(header::CONTENT_TYPE, content_type);
        headers.insert(X_CACHE, HeaderValue::from_static("hit"));
        response
    }
}
