use std::time::Duration;

use serde::Deserialize;

use crate::domain::routing::RoutingVocabulary;
use crate::infrastructure::llm::DEFAULT_BASE_URL;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub llm: LlmConfig,
    pub retrieval: RetrievalConfig,
    pub web_search: WebSearchConfig,
    pub routing: RoutingConfig,
    pub memory: MemoryConfig,
    pub audit: AuditConfig,
    pub session: SessionConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Text generation endpoint (OpenAI-compatible)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
    pub answer_language: String,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalBackend {
    #[default]
    Chroma,
    InMemory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub backend: RetrievalBackend,
    pub chroma_url: String,
    pub collection: String,
    pub top_k: usize,
    pub min_relevance: f32,
    pub context_documents: usize,
    /// Falls back to `llm.base_url` when empty
    pub embedding_base_url: String,
    /// Falls back to `llm.api_key` when empty
    pub embedding_api_key: String,
    pub embedding_model: String,
    /// Seed documents for the in-memory backend
    pub documents: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebSearchConfig {
    pub base_url: String,
    pub api_key: String,
    pub max_results: usize,
    pub context_snippets: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub short_query_chars: usize,
    pub follow_up_max_words: usize,
    #[serde(flatten)]
    pub vocabulary: RoutingVocabulary,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub max_token_limit: usize,
    pub min_recent_turns: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub enabled: bool,
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub marker_file: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            model: "gemini-2.5-flash".to_string(),
            temperature: 0.3,
            timeout_secs: 60,
            answer_language: "Turkish".to_string(),
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            backend: RetrievalBackend::default(),
            chroma_url: "http://localhost:8001".to_string(),
            collection: "rag_docs".to_string(),
            top_k: 4,
            min_relevance: 0.05,
            context_documents: 2,
            embedding_base_url: String::new(),
            embedding_api_key: String::new(),
            embedding_model: "text-embedding-004".to_string(),
            documents: Vec::new(),
        }
    }
}

impl Default for WebSearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.tavily.com".to_string(),
            api_key: String::new(),
            max_results: 5,
            context_snippets: 3,
            timeout_secs: 15,
        }
    }
}

impl WebSearchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            short_query_chars: 10,
            follow_up_max_words: 6,
            vocabulary: RoutingVocabulary::default(),
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_token_limit: 1000,
            min_recent_turns: 1,
        }
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "data/state.json".to_string(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            marker_file: "session.json".to_string(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app: Self = config.try_deserialize()?;
        app.apply_env_fallbacks(|key| std::env::var(key).ok());
        Ok(app)
    }

    /// Fill empty credentials and the model name from the conventional
    /// provider variables.
    pub fn apply_env_fallbacks<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if self.llm.api_key.trim().is_empty() {
            if let Some(key) = present("GOOGLE_API_KEY").or_else(|| present("OPENAI_API_KEY")) {
                self.llm.api_key = key;
            }
        }

        if self.web_search.api_key.trim().is_empty() {
            if let Some(key) = present("TAVILY_API_KEY") {
                self.web_search.api_key = key;
            }
        }

        if let Some(model) = present("MODEL_NAME") {
            self.llm.model = model;
        }
    }

    pub fn embedding_base_url(&self) -> &str {
        if self.retrieval.embedding_base_url.is_empty() {
            &self.llm.base_url
        } else {
            &self.retrieval.embedding_base_url
        }
    }

    pub fn embedding_api_key(&self) -> &str {
        if self.retrieval.embedding_api_key.is_empty() {
            &self.llm.api_key
        } else {
            &self.retrieval.embedding_api_key
        }
    }
}
