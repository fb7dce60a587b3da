//! Request and response bodies of the `/rag` endpoints

use serde::{Deserialize, Serialize};

use crate::domain::answer::{AnswerResult, AuditRecord, SourceTag};
use crate::domain::memory::TranscriptEntry;
use crate::domain::{QueryValidationError, RagQuery};
use crate::infrastructure::rag::SessionTranscript;

/// Body of `POST /rag/query` and `POST /rag/stream`
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl QueryRequest {
    pub fn into_query(self) -> Result<RagQuery, QueryValidationError> {
        RagQuery::validated(&self.query, self.session_id.as_deref())
    }
}

/// Query string of `GET /rag/stream`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StreamParams {
    pub q: String,
    pub session_id: Option<String>,
}

impl StreamParams {
    pub fn into_query(self) -> Result<RagQuery, QueryValidationError> {
        RagQuery::validated(&self.q, self.session_id.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub query: String,
    pub answer: String,
    pub hallucination_score: f32,
    pub answer_grade: f32,
    pub retrieved_docs: Vec<String>,
    pub source: SourceTag,
}

impl From<AnswerResult> for QueryResponse {
    fn from(result: AnswerResult) -> Self {
        Self {
            query: result.query,
            answer: result.answer,
            hallucination_score: result.hallucination_score,
            answer_grade: result.answer_grade,
            retrieved_docs: result.evidence,
            source: result.source,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetSessionResponse {
    pub session_id: String,
    pub reset: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranscriptResponse {
    pub session_id: String,
    pub summary: String,
    pub messages: Vec<TranscriptEntry>,
}

impl From<SessionTranscript> for TranscriptResponse {
    fn from(transcript: SessionTranscript) -> Self {
        Self {
            session_id: transcript.session_id,
            summary: transcript.summary,
            messages: transcript.messages,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryResponse {
    pub count: usize,
    pub records: Vec<AuditRecord>,
}

impl From<Vec<AuditRecord>> for HistoryResponse {
    fn from(records: Vec<AuditRecord>) -> Self {
        Self {
            count: records.len(),
            records,
        }
    }
}
