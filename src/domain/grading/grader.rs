//! Token overlap relevance grader

use serde::{Deserialize, Serialize};

use super::tokens::token_set;
use crate::domain::evidence::RetrievedDocument;

/// Minimum score a document needs to survive grading
pub const DEFAULT_MIN_RELEVANCE: f32 = 0.05;

/// Denominator floor; keeps one- or two-word queries from scoring 1.0 on trivial overlap
const MIN_QUERY_TOKENS: usize = 3;

/// A retrieved document paired with its relevance score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradedDocument {
    pub document: RetrievedDocument,
    /// Relevance score (0.0 - 1.0)
    pub score: f32,
}

impl GradedDocument {
    pub fn new(document: RetrievedDocument, score: f32) -> Self {
        Self { document, score }
    }

    pub fn content(&self) -> &str {
        self.document.content()
    }
}

/// Scores candidate text by shared vocabulary with the query
#[derive(Debug, Clone, Copy)]
pub struct RelevanceGrader {
    min_threshold: f32,
}

impl Default for RelevanceGrader {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_RELEVANCE)
    }
}

impl RelevanceGrader {
    pub fn new(min_threshold: f32) -> Self {
        Self { min_threshold }
    }

    pub fn min_threshold(&self) -> f32 {
        self.min_threshold
    }

    /// Distinct shared tokens divided by `max(3, distinct query tokens)`
    pub fn grade(&self, query: &str, candidate: &str) -> f32 {
        let query_tokens = token_set(query);
        let doc_tokens = token_set(candidate);

        if query_tokens.is_empty() || doc_tokens.is_empty() {
            return 0.0;
        }

        let shared = query_tokens.intersection(&doc_tokens).count();
        shared as f32 / query_tokens.len().max(MIN_QUERY_TOKENS) as f32
    }

    /// Score every candidate, drop those under the threshold and sort the rest
    /// by descending score. Ties keep their retrieval order.
    ///
    /// An empty result is a normal outcome, not an error.
    pub fn filter_and_rank(
        &self,
        query: &str,
        candidates: Vec<RetrievedDocument>,
    ) -> Vec<GradedDocument> {
        let mut graded: Vec<GradedDocument> = candidates
            .into_iter()
            .map(|doc| {
                let score = self.grade(query, doc.content());
                GradedDocument::new(doc, score)
            })
            .filter(|graded| graded.score >= self.min_threshold)
            .collect();

        // sort_by is stable
        graded.sort_by(|a, b| b.score.total_cmp(&a.score));
        graded
    }
}
