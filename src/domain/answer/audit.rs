//! Audit records and the audit log trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(test)]
use mockall::automock;

use super::AnswerResult;
use crate::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AuditScores {
    pub hallucination: f32,
    pub grade: f32,
}

/// One answered query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,
    pub query: String,
    pub answer: String,
    pub scores: AuditScores,
}

impl AuditRecord {
    pub fn new(query: impl Into<String>, answer: impl Into<String>, scores: AuditScores) -> Self {
        Self {
            timestamp: Utc::now(),
            query: query.into(),
            answer: answer.into(),
            scores,
        }
    }
}

impl From<&AnswerResult> for AuditRecord {
    fn from(result: &AnswerResult) -> Self {
        Self::new(
            result.query.clone(),
            result.answer.clone(),
            AuditScores {
                hallucination: result.hallucination_score,
                grade: result.answer_grade,
            },
        )
    }
}

/// Accumulated history of answered queries.
///
/// Appends are best-effort: callers log and ignore errors.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AuditLog: Send + Sync {
    /// Append a record to the history
    async fn append(&self, record: AuditRecord) -> Result<(), DomainError>;

    /// All records in insertion order
    async fn history(&self) -> Result<Vec<AuditRecord>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::assessment::AnswerScores;
    use crate::domain::answer::SourceTag;
    use crate::domain::routing::Route;

    #[test]
    fn test_record_from_result() {
        let result = AnswerResult::new(
            "merhaba",
            Route::GenericChat,
            SourceTag::GenericLlm,
            "Merhaba!",
            AnswerScores::chat(),
        );

        let record = AuditRecord::from(&result);
        assert_eq!(record.query, "merhaba");
        assert_eq!(record.answer, "Merhaba!");
        assert_eq!(record.scores.hallucination, 1.0);
        assert_eq!(record.scores.grade, 1.0);
    }

    #[test]
    fn test_record_serialization_shape() {
        let record = AuditRecord::new("q", "a", AuditScores { hallucination: 0.9, grade: 0.6 });
        let json = serde_json::to_value(&record).unwrap();

        assert!(json.get("timestamp").is_some());
        assert!((json["scores"]["grade"].as_f64().unwrap() - 0.6).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_mock_audit_log() {
        let mut log = MockAuditLog::new();
        log.expect_append().times(1).returning(|_| Ok(()));

        log.append(AuditRecord::new("q", "a", AuditScores { hallucination: 0.0, grade: 0.0 }))
            .await
            .unwrap();
    }
}
