//! Chroma vector store over its HTTP API

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::domain::embedding::EmbeddingProvider;
use crate::domain::evidence::{RetrievedDocument, SemanticRetriever};
use crate::domain::DomainError;
use crate::infrastructure::llm::HttpClientTrait;

/// Nearest-neighbour lookup in a Chroma collection.
///
/// The collection is populated by a separate ingestion job; this adapter only
/// reads. The query is embedded with the same model used at ingestion.
#[derive(Debug)]
pub struct ChromaRetriever<C: HttpClientTrait> {
    client: C,
    base_url: String,
    collection: String,
    embedder: Arc<dyn EmbeddingProvider>,
    collection_id: OnceCell<String>,
}

impl<C: HttpClientTrait> ChromaRetriever<C> {
    pub fn new(
        client: C,
        base_url: impl Into<String>,
        collection: impl Into<String>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            collection: collection.into(),
            embedder,
            collection_id: OnceCell::new(),
        }
    }

    fn headers() -> Vec<(&'static str, &'static str)> {
        vec![("Content-Type", "application/json")]
    }

    /// Resolve the collection name to its id once per process
    async fn collection_id(&self) -> Result<&str, DomainError> {
        let id = self
            .collection_id
            .get_or_try_init(|| async {
                let url = format!("{}/api/v1/collections/{}", self.base_url, self.collection);
                let json = self.client.get_json(&url, Self::headers()).await?;
                let info: CollectionInfo = serde_json::from_value(json).map_err(|e| {
                    DomainError::retrieval(format!("Unexpected collection response: {}", e))
                })?;
                debug!(collection = %self.collection, id = %info.id, "Resolved Chroma collection");
                Ok::<String, DomainError>(info.id)
            })
            .await?;

        Ok(id.as_str())
    }

    fn rows_to_documents(&self, response: QueryResponse) -> Vec<RetrievedDocument> {
        let documents = response.documents.into_iter().next().unwrap_or_default();
        let ids = response.ids.into_iter().next().unwrap_or_default();
        let distances = response
            .distances
            .and_then(|d| d.into_iter().next())
            .unwrap_or_default();

        documents
            .into_iter()
            .enumerate()
            .filter_map(|(i, content)| {
                let content = content?;
                let mut doc = RetrievedDocument::collection(self.collection.clone(), content);
                if let Some(id) = ids.get(i) {
                    doc = doc.with_id(id.clone());
                }
                if let Some(Some(distance)) = distances.get(i) {
                    doc = doc.with_distance(*distance);
                }
                Some(doc)
            })
            .collect()
    }
}

#[async_trait]
impl<C: HttpClientTrait> SemanticRetriever for ChromaRetriever<C> {
    async fn retrieve_semantic(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<RetrievedDocument>, DomainError> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let embedding = self.embedder.embed_query(query).await?;
        let id = self.collection_id().await?;

        let url = format!("{}/api/v1/collections/{}/query", self.base_url, id);
        let body = serde_json::json!({
            "query_embeddings": [embedding],
            "n_results": k,
            "include": ["documents", "distances"],
        });

        let json = self.client.post_json(&url, Self::headers(), &body).await?;
        let response: QueryResponse = serde_json::from_value(json)
            .map_err(|e| DomainError::retrieval(format!("Unexpected query response: {}", e)))?;

        let docs = self.rows_to_documents(response);
        debug!(collection = %self.collection, count = docs.len(), "Chroma query returned");
        Ok(docs)
    }

    fn backend_name(&self) -> &'static str {
        "chroma"
    }
}

#[derive(Debug, Deserialize)]
struct CollectionInfo {
    id: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    ids: Vec<Vec<String>>,
    #[serde(default)]
    documents: Vec<Vec<Option<String>>>,
    #[serde(default)]
    distances: Option<Vec<Vec<Option<f32>>>>,
}
