//! Evidence adapter traits

use std::fmt::Debug;

use async_trait::async_trait;

use super::RetrievedDocument;
use crate::domain::DomainError;

/// Nearest-neighbour lookup against an externally maintained index.
///
/// May return fewer than `k` documents, or none at all.
#[async_trait]
pub trait SemanticRetriever: Send + Sync + Debug {
    async fn retrieve_semantic(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<RetrievedDocument>, DomainError>;

    /// Backend name for logs
    fn backend_name(&self) -> &'static str;
}

/// Ranked snippets from a live web search.
///
/// Implementations swallow and log provider failures; the caller only ever
/// sees an empty list.
#[async_trait]
pub trait WebSearcher: Send + Sync + Debug {
    async fn retrieve_web(&self, query: &str) -> Vec<RetrievedDocument>;

    fn provider_name(&self) -> &'static str;
}
