//! Session management

use axum::extract::{Path, State};
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, ResetSessionResponse, TranscriptResponse};

/// DELETE /rag/sessions/{session_id}
pub async fn reset_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<ResetSessionResponse> {
    let reset = state.pipeline.reset_session(&session_id).await;
    info!(session_id = %session_id, reset, "Session reset requested");

    Json(ResetSessionResponse { session_id, reset })
}

/// GET /rag/sessions/{session_id}/messages
pub async fn export_messages(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<TranscriptResponse>, ApiError> {
    state
        .pipeline
        .transcript(&session_id)
        .await
        .map(|transcript| Json(TranscriptResponse::from(transcript)))
        .ok_or_else(|| ApiError::not_found(format!("Session '{}' not found", session_id)))
}
