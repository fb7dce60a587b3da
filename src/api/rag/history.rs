//! Audit history read-back

use axum::extract::State;

use crate::api::state::AppState;
use crate::api::types::{ApiError, HistoryResponse, Json};

/// GET /rag/history
pub async fn list_history(State(state): State<AppState>) -> Result<Json<HistoryResponse>, ApiError> {
    let records = state.pipeline.history().await?;
    Ok(Json(HistoryResponse::from(records)))
}
