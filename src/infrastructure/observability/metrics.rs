//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::MetricsConfig;
use crate::domain::answer::SourceTag;
use crate::domain::routing::Route;

static UUID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}").unwrap()
});
static NUMERIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\d+(/|$)").unwrap());

const MAX_PATH_LABEL_CHARS: usize = 50;

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the /metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Install the global Prometheus recorder; `None` when disabled or already installed
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("rag_service_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
            tracing::info!(path = %config.path, "Prometheus metrics initialized");

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Create the metrics router
pub fn create_metrics_router(metrics: PrometheusMetrics, path: &str) -> Router {
    Router::new()
        .route(path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record an HTTP request metric
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

/// Count a routed query
pub fn record_route(route: Route) {
    counter!("rag_requests_total", "route" => route.as_str()).increment(1);
}

pub fn record_rewrite() {
    counter!("rag_rewrites_total").increment(1);
}

pub fn record_web_fallback() {
    counter!("rag_web_fallbacks_total").increment(1);
}

pub fn record_generation_failure(source: SourceTag) {
    counter!("rag_generation_failures_total", "source" => source.as_str()).increment(1);
}

/// Record end-to-end latency of an answered query
pub fn record_rag_request(source: SourceTag, duration: Duration) {
    histogram!("rag_request_duration_seconds", "source" => source.as_str())
        .record(duration.as_secs_f64());
}

/// Sanitize URL path for metric labels (remove IDs, limit cardinality)
fn sanitize_path(path: &str) -> String {
    let path = UUID_RE.replace_all(path, "{id}");
    let path = NUMERIC_RE.replace_all(&path, "/{id}$1");

    path.chars().take(MAX_PATH_LABEL_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path_uuid() {
        let path = "/rag/sessions/550e8400-e29b-41d4-a716-446655440000";
        assert_eq!(sanitize_path(path), "/rag/sessions/{id}");
    }

    #[test]
    fn test_sanitize_path_numeric_id() {
        assert_eq!(sanitize_path("/rag/sessions/123/messages"), "/rag/sessions/{id}/messages");
    }

    #[test]
    fn test_sanitize_path_no_id() {
        assert_eq!(sanitize_path("/health"), "/health");
    }

    #[test]
    fn test_sanitize_path_truncates_on_char_boundary() {
        let path = format!("/{}", "ş".repeat(80));
        let sanitized = sanitize_path(&path);
        assert_eq!(sanitized.chars().count(), MAX_PATH_LABEL_CHARS);
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_route(Route::Web);
        record_rewrite();
        record_web_fallback();
        record_generation_failure(SourceTag::ChromaDb);
        record_rag_request(SourceTag::GenericLlm, Duration::from_millis(5));
    }
}
