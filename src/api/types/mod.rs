//! Request and response types of the HTTP API

pub mod error;
pub mod json;
pub mod rag;

pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
pub use rag::{
    HistoryResponse, QueryRequest, QueryResponse, ResetSessionResponse, StreamParams,
    TranscriptResponse,
};
