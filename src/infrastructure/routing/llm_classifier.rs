//! Language-model classifier strategy

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::routing::{ClassifierStrategy, Route};
use crate::domain::{LlmProvider, LlmRequest};

fn classification_prompt(query: &str) -> String {
    format!(
        "Question: \"{query}\"\n\n\
         Classify this question:\n\
         - DOMAIN: about the company's own indexed or internal information\n\
         - WEB: needs external or current information from the outside world\n\
         - GENERIC_CHAT: greetings, small talk or general conversation\n\n\
         Reply only in this format:\n\
         route=DOMAIN|WEB|GENERIC_CHAT"
    )
}

/// Asks the model for a route label.
///
/// Has no opinion when no credential is configured, when the call fails or
/// when the reply carries no recognizable label.
#[derive(Debug)]
pub struct LlmClassifier {
    provider: Arc<dyn LlmProvider>,
    model: String,
}

impl LlmClassifier {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }
}

#[async_trait]
impl ClassifierStrategy for LlmClassifier {
    async fn classify(&self, query: &str) -> Option<Route> {
        if !self.provider.has_credential() {
            return None;
        }

        let request = LlmRequest::builder()
            .user(classification_prompt(query))
            .temperature(0.0)
            .build();

        match self.provider.chat(&self.model, request).await {
            Ok(response) => {
                let route = Route::from_label(response.content());
                debug!(reply = %response.content().trim(), route = ?route, "Model classification");
                route
            }
            Err(e) => {
                warn!(error = %e, "Model classification failed, using default route");
                None
            }
        }
    }

    fn strategy_name(&self) -> &'static str {
        "llm"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::MockLlmProvider;

    #[tokio::test]
    async fn test_parses_label() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_reply("route=WEB"));
        let classifier = LlmClassifier::new(provider.clone(), "m");

        assert_eq!(classifier.classify("who won yesterday").await, Some(Route::Web));
        assert!(provider.requests()[0].user_text().contains("who won yesterday"));
    }

    #[tokio::test]
    async fn test_unparseable_reply_has_no_opinion() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_reply("not sure"));
        let classifier = LlmClassifier::new(provider, "m");
        assert_eq!(classifier.classify("something").await, None);
    }

    #[tokio::test]
    async fn test_error_has_no_opinion() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_error("timeout"));
        let classifier = LlmClassifier::new(provider, "m");
        assert_eq!(classifier.classify("something").await, None);
    }

    #[tokio::test]
    async fn test_no_credential_skips_call() {
        let provider = Arc::new(
            MockLlmProvider::new("mock")
                .with_reply("route=DOMAIN")
                .without_credential(),
        );
        let classifier = LlmClassifier::new(provider.clone(), "m");

        assert_eq!(classifier.classify("something").await, None);
        assert_eq!(provider.call_count(), 0);
    }
}
