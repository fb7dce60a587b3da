//! Domain layer - Core types, traits and algorithms
//!
//! Nothing in here performs I/O; adapters live in `infrastructure`.

pub mod answer;
pub mod assessment;
pub mod embedding;
pub mod error;
pub mod evidence;
pub mod grading;
pub mod llm;
pub mod memory;
pub mod query;
pub mod routing;

pub use answer::{AnswerResult, AuditLog, AuditRecord, AuditScores, SourceTag};
pub use assessment::AnswerScores;
pub use embedding::EmbeddingProvider;
pub use error::DomainError;
pub use evidence::{RetrievedDocument, SemanticRetriever, WebSearcher};
pub use grading::{GradedDocument, RelevanceGrader};
pub use llm::{
    FinishReason, LlmProvider, LlmRequest, LlmRequestBuilder, LlmResponse, LlmStream, Message,
    MessageRole, StreamChunk, Usage,
};
pub use memory::{ConversationMemory, MemoryLimits, SessionHandle, SessionStore, TurnSummarizer};
pub use query::{QueryValidationError, RagQuery};
pub use routing::{ClassifierStrategy, QueryRouter, Route, RouteDecision};
