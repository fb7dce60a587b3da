//! Answer result

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::assessment::AnswerScores;
use crate::domain::routing::Route;

/// Shown instead of an answer when chat or document generation fails
pub const DOMAIN_FAILURE_ANSWER: &str = "An error occurred while generating the answer.";

/// Shown instead of an answer when generation over web results fails
pub const WEB_FAILURE_ANSWER: &str = "An error occurred while processing the web results.";

/// Which generation path produced the answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceTag {
    #[serde(rename = "generic_llm")]
    GenericLlm,
    #[serde(rename = "web_search")]
    WebSearch,
    #[serde(rename = "chroma_db")]
    ChromaDb,
}

impl SourceTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GenericLlm => "generic_llm",
            Self::WebSearch => "web_search",
            Self::ChromaDb => "chroma_db",
        }
    }

    /// Answer text used when generation on this path fails
    pub fn failure_answer(&self) -> &'static str {
        match self {
            Self::WebSearch => WEB_FAILURE_ANSWER,
            Self::GenericLlm | Self::ChromaDb => DOMAIN_FAILURE_ANSWER,
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The unit returned to callers and written to the audit log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResult {
    /// Query exactly as the caller sent it
    pub query: String,
    /// Route chosen by the router; differs from the source on web fallback
    pub route: Route,
    pub source: SourceTag,
    pub answer: String,
    pub hallucination_score: f32,
    pub answer_grade: f32,
    /// Evidence texts the answer was generated from
    pub evidence: Vec<String>,
    /// Set when generation failed and `answer` is a fallback message
    #[serde(default)]
    pub generation_failed: bool,
}

impl AnswerResult {
    pub fn new(
        query: impl Into<String>,
        route: Route,
        source: SourceTag,
        answer: impl Into<String>,
        scores: AnswerScores,
    ) -> Self {
        Self {
            query: query.into(),
            route,
            source,
            answer: answer.into(),
            hallucination_score: scores.hallucination,
            answer_grade: scores.grade,
            evidence: Vec::new(),
            generation_failed: false,
        }
    }

    pub fn with_evidence(mut self, evidence: Vec<String>) -> Self {
        self.evidence = evidence;
        self
    }

    pub fn failed(mut self) -> Self {
        self.generation_failed = true;
        self
    }

    pub fn scores(&self) -> AnswerScores {
        AnswerScores::new(self.hallucination_score, self.answer_grade)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_tag_serialization() {
        assert_eq!(serde_json::to_string(&SourceTag::GenericLlm).unwrap(), "\"generic_llm\"");
        assert_eq!(serde_json::to_string(&SourceTag::WebSearch).unwrap(), "\"web_search\"");
        assert_eq!(serde_json::to_string(&SourceTag::ChromaDb).unwrap(), "\"chroma_db\"");
    }

    #[test]
    fn test_failure_answers() {
        assert_eq!(SourceTag::WebSearch.failure_answer(), WEB_FAILURE_ANSWER);
        assert_eq!(SourceTag::ChromaDb.failure_answer(), DOMAIN_FAILURE_ANSWER);
        assert_eq!(SourceTag::GenericLlm.failure_answer(), DOMAIN_FAILURE_ANSWER);
    }

    #[test]
    fn test_builder() {
        let result = AnswerResult::new(
            "q",
            Route::Domain,
            SourceTag::WebSearch,
            "a",
            AnswerScores::new(0.4, 0.6),
        )
        .with_evidence(vec!["snippet".into()]);

        assert_eq!(result.evidence, vec!["snippet"]);
        assert_eq!(result.scores(), AnswerScores::new(0.4, 0.6));
        assert!(!result.generation_failed);
        assert!(result.failed().generation_failed);
    }
}
