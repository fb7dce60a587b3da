//! Model-backed running summary

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::memory::{ConversationTurn, TurnSummarizer};
use crate::domain::{DomainError, LlmProvider, LlmRequest};

const SUMMARY_INSTRUCTIONS: &str = "Progressively summarize the lines of conversation provided, \
adding onto the previous summary and returning a new summary. Keep names, preferences and \
facts the user shared about themselves.";

/// Compresses pruned turns with one model call
#[derive(Debug)]
pub struct LlmSummarizer {
    provider: Arc<dyn LlmProvider>,
    model: String,
}

impl LlmSummarizer {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    fn prompt(existing: &str, pruned: &[ConversationTurn]) -> String {
        let lines: Vec<String> = pruned
            .iter()
            .map(|t| format!("Human: {}\nAI: {}", t.user, t.assistant))
            .collect();

        format!(
            "{SUMMARY_INSTRUCTIONS}\n\nCurrent summary:\n{}\n\nNew lines of conversation:\n{}\n\nNew summary:",
            if existing.is_empty() { "(none)" } else { existing },
            lines.join("\n")
        )
    }
}

#[async_trait]
impl TurnSummarizer for LlmSummarizer {
    async fn summarize(
        &self,
        existing: &str,
        pruned: &[ConversationTurn],
    ) -> Result<String, DomainError> {
        let request = LlmRequest::builder()
            .user(Self::prompt(existing, pruned))
            .temperature(0.0)
            .build();

        let response = self.provider.chat(&self.model, request).await?;
        Ok(response.content().trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::MockLlmProvider;
    use crate::domain::memory::{ConversationMemory, MemoryLimits};

    #[tokio::test]
    async fn test_summarize_includes_turns() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_reply("  The user is Deniz.  "));
        let summarizer = LlmSummarizer::new(provider.clone(), "m");

        let summary = summarizer
            .summarize("", &[ConversationTurn::new("I am Deniz", "Hello Deniz")])
            .await
            .unwrap();

        assert_eq!(summary, "The user is Deniz.");
        let prompt = provider.requests()[0].user_text();
        assert!(prompt.contains("Human: I am Deniz"));
        assert!(prompt.contains("(none)"));
    }

    #[tokio::test]
    async fn test_error_propagates() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_error("quota"));
        let summarizer = LlmSummarizer::new(provider, "m");

        assert!(summarizer.summarize("s", &[]).await.is_err());
    }

    #[tokio::test]
    async fn test_drives_memory_compression() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_reply("Earlier: greetings."));
        let mut memory = ConversationMemory::new(MemoryLimits {
            max_token_limit: 5,
            min_recent_turns: 1,
        })
        .with_summarizer(Arc::new(LlmSummarizer::new(provider, "m")));

        memory.add_turn("merhaba nasılsın", "iyiyim teşekkürler").await;
        memory.add_turn("adım Deniz", "memnun oldum").await;

        assert_eq!(memory.summary(), "Earlier: greetings.");
        assert_eq!(memory.turn_count(), 1);
    }
}
