//! Embedding provider trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Turns query text into a vector for nearest-neighbour lookup
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, DomainError>;

    fn provider_name(&self) -> &'static str;
}
