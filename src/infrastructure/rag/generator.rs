//! Text generation over the configured chat model

use std::pin::Pin;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use tracing::{debug, warn};

use super::prompt::PromptBuilder;
use crate::domain::{DomainError, LlmProvider, LlmRequest};

/// Text increments in generation order
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, DomainError>> + Send>>;

/// Wraps the provider with the model name and sampling settings
#[derive(Debug, Clone)]
pub struct Generator {
    provider: Arc<dyn LlmProvider>,
    model: String,
    temperature: f32,
}

impl Generator {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.3,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.provider
    }

    fn prepare(&self, mut request: LlmRequest) -> LlmRequest {
        if request.temperature.is_none() {
            request.temperature = Some(self.temperature);
        }
        request
    }

    /// One blocking completion, trimmed. An empty completion is an error.
    pub async fn generate(&self, request: LlmRequest) -> Result<String, DomainError> {
        let response = self
            .provider
            .chat(&self.model, self.prepare(request))
            .await?;

        let text = response.content().trim();
        if text.is_empty() {
            return Err(DomainError::provider(
                self.provider.provider_name(),
                "empty completion",
            ));
        }

        Ok(text.to_string())
    }

    /// Incremental completion; empty deltas are dropped
    pub async fn generate_stream(&self, request: LlmRequest) -> Result<TextStream, DomainError> {
        let stream = self
            .provider
            .chat_stream(&self.model, self.prepare(request))
            .await?;

        let text = stream.filter_map(|chunk| async move {
            match chunk {
                Ok(chunk) => chunk.delta.filter(|delta| !delta.is_empty()).map(Ok),
                Err(e) => Some(Err(e)),
            }
        });

        Ok(Box::pin(text))
    }

    /// Ask the model to rephrase `query` for retrieval.
    ///
    /// Returns `None` when the call fails or the rewrite is empty or only
    /// differs from the query in case.
    pub async fn rewrite(&self, prompts: &PromptBuilder, query: &str) -> Option<String> {
        match self.generate(prompts.rewrite(query)).await {
            Ok(rewritten) => {
                let rewritten = rewritten.trim().trim_matches('"').trim().to_string();
                if rewritten.is_empty() || rewritten.to_lowercase() == query.to_lowercase() {
                    debug!("Rewrite produced no new query");
                    None
                } else {
                    Some(rewritten)
                }
            }
            Err(e) => {
                warn!(error = %e, "Query rewrite failed");
                None
            }
        }
    }
}
