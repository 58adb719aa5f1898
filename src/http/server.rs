//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all site handler
//! - Wire up middleware (request ID, tracing, timeout)
//! - Serve from and fill the global response cache
//! - Swap in a rebuilt site when the configuration changes
//!
//! # Design Decisions
//! - Routing and controllers do blocking file I/O, so dispatch runs on the
//!   blocking pool
//! - The current site lives in an `ArcSwap`; in-flight requests finish on
//!   the site they started with
//! - A configuration that fails to build keeps the running site

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request, StatusCode},
    response::Response,
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::cache::{Store, GLOBAL_STORE};
use crate::config::schema::SiteConfig;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer, site_path};
use crate::http::response::{self, global_cache_key, is_cacheable, CachedResponse, HTML, X_CACHE};
use crate::observability::metrics::{self, CacheOutcome};
use crate::site::Site;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub site: Arc<ArcSwap<Site>>,
}

/// HTTP server for a site.
pub struct HttpServer {
    router: Router,
    site: Arc<ArcSwap<Site>>,
}

impl HttpServer {
    pub fn new(site: Site) -> Self {
        let timeout = Duration::from_secs(site.config().timeouts.request_secs);
        let site = Arc::new(ArcSwap::from_pointee(site));
        let router = Self::build_router(timeout, AppState { site: site.clone() });
        Self { router, site }
    }

    /// Handle to the live site, shared with the request handlers.
    pub fn site(&self) -> Arc<ArcSwap<Site>> {
        self.site.clone()
    }

    #[allow(deprecated)]
    fn build_router(timeout: Duration, state: AppState) -> Router {
        Router::new()
            .route("/", get(site_handler))
            .route("/{*path}", get(site_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(propagate_request_id_layer())
                    .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                        tracing::info_span!(
                            "request",
                            request_id = %request_id(req.headers()),
                            method = %req.method(),
                            uri = %req.uri(),
                        )
                    }))
                    .layer(TimeoutLayer::new(timeout)),
            )
    }

    /// Serve until `shutdown` fires, rebuilding the site for every config
    /// received on `config_updates`.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<SiteConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let site = self.site.clone();
        let reloader = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                match tokio::task::spawn_blocking(move || Site::build(config)).await {
                    Ok(Ok(rebuilt)) => {
                        site.store(Arc::new(rebuilt));
                        metrics::record_reload(true);
                        tracing::info!("Site reloaded");
                    }
                    Ok(Err(e)) => {
                        metrics::record_reload(false);
                        tracing::error!(error = %e, "Site rebuild failed, keeping current site");
                    }
                    Err(e) => {
                        metrics::record_reload(false);
                        tracing::error!(error = %e, "Site rebuild task failed");
                    }
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                if shutdown.recv().await.is_err() {
                    tracing::debug!("Shutdown channel closed");
                }
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Every GET and HEAD request lands here.
async fn site_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = site_path(request.uri());
    let site = state.site.load_full();

    let cache = global_cache(&site, &path);
    if let Some((store, key)) = &cache {
        let hit = store
            .get(key)
            .and_then(|data| serde_json::from_value::<CachedResponse>(data).ok());
        if let Some(hit) = hit {
            metrics::record_cache(CacheOutcome::Hit);
            metrics::record_request(&method, StatusCode::OK.as_u16(), start);
            return hit.into_response();
        }
        metrics::record_cache(CacheOutcome::Miss);
    }

    let dispatch_site = site.clone();
    let dispatch_path = path.clone();
    let rendered = tokio::task::spawn_blocking(move || dispatch_site.dispatch(&dispatch_path)).await;
    let rendered = match rendered {
        Ok(rendered) => rendered,
        Err(e) => {
            tracing::error!(path = %path, error = %e, "Dispatch task failed");
            response::internal_error()
        }
    };

    let rendered = match cache {
        Some((store, key)) if rendered.status() == StatusCode::OK => {
            store_response(store.as_ref(), &key, site.config().cache.expires, rendered).await
        }
        _ => rendered,
    };

    metrics::record_request(&method, rendered.status().as_u16(), start);
    rendered
}

/// The global store and key for a path, when global caching applies to it.
fn global_cache(site: &Site, path: &str) -> Option<(Arc<dyn Store>, String)> {
    let config = &site.config().cache;
    if !config.global || !is_cacheable(path, &config.global_exclude) {
        return None;
    }
    let store = site.cache().store(GLOBAL_STORE)?;
    Some((store, global_cache_key(path)))
}

async fn store_response(store: &dyn Store, key: &str, expires: u64, rendered: Response) -> Response {
    let (mut parts, body) = rendered.into_parts();
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(key = %key, error = %e, "Failed to buffer response for caching");
            return response::internal_error();
        }
    };

    let content_type = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(HTML)
        .to_string();

    if let Ok(body) = std::str::from_utf8(&bytes) {
        let cached = CachedResponse::new(&content_type, body.to_string());
        let stored = serde_json::to_value(&cached)
            .map_err(crate::cache::CacheError::from)
            .and_then(|data| store.put(key, data, expires));
        match stored {
            Ok(()) => metrics::record_cache(CacheOutcome::Stored),
            Err(e) => tracing::warn!(key = %key, error = %e, "Failed to store response in global cache"),
        }
    }

    parts.headers.insert(X_CACHE, HeaderValue::from_static("miss"));
    Response::from_parts(parts, Body::from(bytes))
}
