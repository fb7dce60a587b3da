//! Observability infrastructure - Prometheus metrics

mod metrics;

pub use metrics::{
    create_metrics_router, init_metrics, record_generation_failure, record_http_request,
    record_rag_request, record_rewrite, record_route, record_web_fallback, PrometheusMetrics,
};
