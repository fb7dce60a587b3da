//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, AuditConfig, LlmConfig, LogFormat, LoggingConfig, MemoryConfig, MetricsConfig,
    RetrievalBackend, RetrievalConfig, RoutingConfig, ServerConfig, SessionConfig,
    WebSearchConfig,
};
