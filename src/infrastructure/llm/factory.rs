use std::sync::Arc;
use std::time::Duration;

use super::http_client::HttpClient;
use super::OpenAiProvider;
use crate::domain::{DomainError, LlmProvider};

/// Connection settings for the chat model
#[derive(Debug, Clone)]
pub struct LlmProviderConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

/// Factory for creating LLM providers
#[derive(Debug)]
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Create an OpenAI-compatible provider with a bounded request timeout
    pub fn create(config: &LlmProviderConfig) -> Result<Arc<dyn LlmProvider>, DomainError> {
        if config.base_url.trim().is_empty() {
            return Err(DomainError::configuration("llm.base_url cannot be empty"));
        }

        let http_client = HttpClient::with_timeout(config.timeout)?;
        Ok(Arc::new(OpenAiProvider::with_base_url(
            http_client,
            config.api_key.clone(),
            config.base_url.clone(),
        )))
    }

    /// Create a provider against the default endpoint without a timeout
    pub fn create_default(api_key: impl Into<String>) -> Arc<dyn LlmProvider> {
        Arc::new(OpenAiProvider::new(HttpClient::new(), api_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: &str) -> LlmProviderConfig {
        LlmProviderConfig {
            base_url: "http://localhost:9999/v1".to_string(),
            api_key: api_key.to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_create_provider() {
        let provider = LlmProviderFactory::create(&config("test-key")).unwrap();
        assert_eq!(provider.provider_name(), "openai");
        assert!(provider.has_credential());
    }

    #[test]
    fn test_create_without_key_degrades() {
        let provider = LlmProviderFactory::create(&config("")).unwrap();
        assert!(!provider.has_credential());
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let mut cfg = config("k");
        cfg.base_url = " ".to_string();

        let error = LlmProviderFactory::create(&cfg).unwrap_err();
        assert!(error.to_string().contains("base_url"));
    }

    #[test]
    fn test_create_default() {
        let provider = LlmProviderFactory::create_default("k");
        assert_eq!(provider.provider_name(), "openai");
    }
}
