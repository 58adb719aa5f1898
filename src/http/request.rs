//! Request identification and path extraction.
//!
//! # Responsibilities
//! - Attach a UUID request ID to every request and echo it on the response
//! - Extract the site path the router matches against
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - An ID supplied by the client is kept

use axum::http::{HeaderMap, HeaderName, Uri};
use percent_encoding::percent_decode_str;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

pub const X_REQUEST_ID: &str = "x-request-id";

/// Layer that sets `x-request-id` when the client did not.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID), MakeRequestUuid)
}

/// Layer that copies `x-request-id` onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID))
}

pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// The path component, without query string, with `%XX` escapes decoded.
/// Invalid escapes are kept as written; a non-UTF-8 result falls back to the
/// raw path.
pub fn site_path(uri: &Uri) -> String {
    let raw = uri.path();
    match percent_decode_str(raw).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(e) => {
            tracing::debug!(path = %raw, error = %e, "Path does not decode to UTF-8");
            raw.to_string()
        }
    }
}
