//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::rag::RagPipeline;

/// Shared by every handler; cloning is cheap
#[derive(Debug, Clone)]
pub struct AppState {
    pub pipeline: Arc<RagPipeline>,
}

impl AppState {
    pub fn new(pipeline: Arc<RagPipeline>) -> Self {
        Self { pipeline }
    }
}
