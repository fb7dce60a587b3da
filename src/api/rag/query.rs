//! Synchronous answering

use axum::extract::State;
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, QueryRequest, QueryResponse};

/// POST /rag/query
pub async fn answer_query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    let query = request.into_query()?;
    info!(session_id = ?query.session_id, "Answering query");

    let result = state.pipeline.run(query).await?;
    Ok(Json(QueryResponse::from(result)))
}
