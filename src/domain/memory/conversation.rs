//! Single-session conversation memory

use std::collections::VecDeque;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::TurnSummarizer;
use crate::domain::llm::MessageRole;

/// Rough characters-per-token ratio used to size the buffer
const CHARS_PER_TOKEN: usize = 4;

/// One completed exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub user: String,
    pub assistant: String,
}

impl ConversationTurn {
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
        }
    }

    fn estimated_tokens(&self) -> usize {
        estimate_tokens(&self.user) + estimate_tokens(&self.assistant)
    }

    fn as_lines(&self) -> String {
        format!("User: {}\nAssistant: {}", self.user, self.assistant)
    }
}

/// A transcript line for export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: MessageRole,
    pub content: String,
}

/// Buffer sizing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryLimits {
    /// Approximate token budget of the verbatim buffer
    pub max_token_limit: usize,
    /// Turns that always stay verbatim, even over budget
    pub min_recent_turns: usize,
}

impl Default for MemoryLimits {
    fn default() -> Self {
        Self {
            max_token_limit: 1000,
            min_recent_turns: 1,
        }
    }
}

fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}

/// Last `max_chars` characters of `text`
fn keep_tail(text: &str, max_chars: usize) -> String {
    let count = text.chars().count();
    if count <= max_chars {
        return text.to_string();
    }
    text.chars().skip(count - max_chars).collect()
}

/// Running summary plus recent verbatim turns.
///
/// Only mutated by [`ConversationMemory::add_turn`] after an answer is final.
#[derive(Debug, Clone)]
pub struct ConversationMemory {
    summary: String,
    turns: VecDeque<ConversationTurn>,
    limits: MemoryLimits,
    summarizer: Option<Arc<dyn TurnSummarizer>>,
}

impl ConversationMemory {
    pub fn new(limits: MemoryLimits) -> Self {
        Self {
            summary: String::new(),
            turns: VecDeque::new(),
            limits,
            summarizer: None,
        }
    }

    pub fn with_summarizer(mut self, summarizer: Arc<dyn TurnSummarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.summary.is_empty() && self.turns.is_empty()
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn turns(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter()
    }

    pub fn turn_count(&self) -> usize {
        self.turns.len()
    }

    fn buffered_tokens(&self) -> usize {
        self.turns.iter().map(ConversationTurn::estimated_tokens).sum()
    }

    /// Summary followed by recent turns as one text block; empty when there
    /// is no history yet
    pub fn build_context(&self) -> String {
        let mut sections = Vec::new();

        if !self.summary.is_empty() {
            sections.push(format!("Summary of earlier conversation: {}", self.summary));
        }

        sections.extend(self.turns.iter().map(ConversationTurn::as_lines));
        sections.join("\n")
    }

    /// Verbatim recent turns flattened into user/assistant entries
    pub fn transcript(&self) -> Vec<TranscriptEntry> {
        self.turns
            .iter()
            .flat_map(|turn| {
                [
                    TranscriptEntry {
                        role: MessageRole::User,
                        content: turn.user.clone(),
                    },
                    TranscriptEntry {
                        role: MessageRole::Assistant,
                        content: turn.assistant.clone(),
                    },
                ]
            })
            .collect()
    }

    /// Append a completed turn, compressing the oldest turns into the
    /// summary once the buffer exceeds its budget.
    pub async fn add_turn(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.turns.push_back(ConversationTurn::new(user, assistant));

        let mut pruned = Vec::new();
        while self.buffered_tokens() > self.limits.max_token_limit
            && self.turns.len() > self.limits.min_recent_turns
        {
            if let Some(turn) = self.turns.pop_front() {
                pruned.push(turn);
            }
        }

        if pruned.is_empty() {
            return;
        }

        debug!(pruned = pruned.len(), remaining = self.turns.len(), "Compressing memory");
        self.summary = self.fold_into_summary(&pruned).await;
    }

    async fn fold_into_summary(&self, pruned: &[ConversationTurn]) -> String {
        if let Some(ref summarizer) = self.summarizer {
            match summarizer.summarize(&self.summary, pruned).await {
                Ok(summary) if !summary.trim().is_empty() => return summary.trim().to_string(),
                Ok(_) => warn!("Summarizer returned empty text, keeping raw turns"),
                Err(e) => warn!(error = %e, "Summarization failed, keeping raw turns"),
            }
        }

        // Without a model the pruned turns are kept as plain text, newest last,
        // capped at the token budget
        let mut parts = Vec::with_capacity(pruned.len() + 1);
        if !self.summary.is_empty() {
            parts.push(self.summary.clone());
        }
        parts.extend(pruned.iter().map(ConversationTurn::as_lines));
        keep_tail(&parts.join("\n"), self.limits.max_token_limit * CHARS_PER_TOKEN)
    }

    pub fn clear(&mut self) {
        self.summary.clear();
        self.turns.clear();
    }
}
