//! In-memory retriever for development and testing

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::evidence::{RetrievedDocument, SemanticRetriever};
use crate::domain::grading::RelevanceGrader;
use crate::domain::DomainError;

/// Collection name reported on documents from this backend
const COLLECTION: &str = "in_memory";

/// Ranks seeded documents by token overlap with the query.
///
/// Stands in for the vector store when no Chroma server is available; only
/// documents sharing at least one token with the query are returned.
#[derive(Debug, Default)]
pub struct InMemoryRetriever {
    documents: RwLock<Vec<String>>,
    grader: RelevanceGrader,
}

impl InMemoryRetriever {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents<I, S>(documents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            documents: RwLock::new(documents.into_iter().map(Into::into).collect()),
            grader: RelevanceGrader::default(),
        }
    }

    pub async fn add_document(&self, content: impl Into<String>) {
        self.documents.write().await.push(content.into());
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl SemanticRetriever for InMemoryRetriever {
    async fn retrieve_semantic(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<RetrievedDocument>, DomainError> {
        let documents = self.documents.read().await;

        let mut scored: Vec<(usize, f32)> = documents
            .iter()
            .enumerate()
            .map(|(i, doc)| (i, self.grader.grade(query, doc)))
            .filter(|(_, score)| *score > 0.0)
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(i, score)| {
                RetrievedDocument::collection(COLLECTION, documents[i].clone())
                    .with_id(format!("doc_{i}"))
                    .with_distance(1.0 - score)
            })
            .collect())
    }

    fn backend_name(&self) -> &'static str {
        "in_memory"
    }
}
