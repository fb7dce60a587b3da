//! Server-sent event streaming

use std::convert::Infallible;

use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{Stream, StreamExt};
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, QueryRequest, StreamParams};
use crate::domain::RagQuery;

/// POST /rag/stream
pub async fn stream_query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    start_stream(&state, request.into_query()?)
}

/// GET /rag/stream?q=...&session_id=...
pub async fn stream_query_get(
    State(state): State<AppState>,
    Query(params): Query<StreamParams>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    start_stream(&state, params.into_query()?)
}

fn start_stream(
    state: &AppState,
    query: RagQuery,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>> + use<>>, ApiError> {
    info!(session_id = ?query.session_id, "Streaming query");

    let events = state.pipeline.stream(query)?;
    let frames = events.filter_map(|event| async move {
        event
            .wire_data()
            .map(|data| Ok::<_, Infallible>(Event::default().data(data)))
    });

    Ok(Sse::new(frames).keep_alive(KeepAlive::default()))
}
