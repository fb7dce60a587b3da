//! Question answering endpoints

pub mod history;
pub mod query;
pub mod sessions;
pub mod stream;

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::state::AppState;

/// Routes mounted under `/rag`
pub fn create_rag_router() -> Router<AppState> {
    Router::new()
        .route("/query", post(query::answer_query))
        .route(
            "/stream",
            post(stream::stream_query).get(stream::stream_query_get),
        )
        .route("/sessions/{session_id}", delete(sessions::reset_session))
        .route(
            "/sessions/{session_id}/messages",
            get(sessions::export_messages),
        )
        .route("/history", get(history::list_history))
}
