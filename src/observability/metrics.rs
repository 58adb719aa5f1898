//! Metrics collection and exposition.
//!
//! # Metrics
//! - `folio_requests_total` (counter): requests by method and status
//! - `folio_request_duration_seconds` (histogram): time to respond
//! - `folio_global_cache_total` (counter): global cache hits, misses, stores
//! - `folio_site_reloads_total` (counter): site rebuilds by result
//! - `folio_not_found_total` (counter): 404 pages rendered
//! - `folio_config_reload_failures_total` (counter): rejected config files

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    let method = method.to_string();
    let status = status.to_string();
    metrics::counter!("folio_requests_total", "method" => method.clone(), "status" => status.clone())
        .increment(1);
    metrics::histogram!("folio_request_duration_seconds", "method" => method, "status" => status)
        .record(start.elapsed().as_secs_f64());
}

/// Global cache outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    Hit,
    Miss,
    Stored,
}

impl CacheOutcome {
    fn label(self) -> &'static str {
        match self {
            CacheOutcome::Hit => "hit",
            CacheOutcome::Miss => "miss",
            CacheOutcome::Stored => "stored",
        }
    }
}

pub fn record_cache(outcome: CacheOutcome) {
    metrics::counter!("folio_global_cache_total", "result" => outcome.label()).increment(1);
}

pub fn record_reload(success: bool) {
    let result = if success { "ok" } else { "error" };
    metrics::counter!("folio_site_reloads_total", "result" => result).increment(1);
}
