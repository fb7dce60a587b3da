//! Turn summarization trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::ConversationTurn;
use crate::domain::DomainError;

/// Folds turns that fell out of the recent buffer into the running summary
#[async_trait]
pub trait TurnSummarizer: Send + Sync + Debug {
    /// Return the new running summary covering `existing` plus `pruned`
    async fn summarize(
        &self,
        existing: &str,
        pruned: &[ConversationTurn],
    ) -> Result<String, DomainError>;
}
