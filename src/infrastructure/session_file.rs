//! Session identifier persisted between CLI invocations

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::DomainError;

#[derive(Debug, Serialize, Deserialize)]
struct SessionMarker {
    session_id: String,
}

/// Marker file holding `{"session_id": "<uuid>"}`
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored id, or generate and store a new one.
    ///
    /// An unreadable or malformed marker is replaced.
    pub async fn load_or_create(&self) -> Result<String, DomainError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => match serde_json::from_str::<SessionMarker>(&raw) {
                Ok(marker) if !marker.session_id.trim().is_empty() => {
                    debug!(session_id = %marker.session_id, "Loaded session marker");
                    return Ok(marker.session_id);
                }
                Ok(_) => warn!(path = %self.path.display(), "Empty session marker, replacing"),
                Err(e) => warn!(path = %self.path.display(), error = %e, "Malformed session marker, replacing"),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(DomainError::storage(format!(
                    "Failed to read {}: {e}",
                    self.path.display()
                )));
            }
        }

        let session_id = Uuid::new_v4().to_string();
        self.store(&session_id).await?;
        debug!(session_id = %session_id, "Created session marker");
        Ok(session_id)
    }

    async fn store(&self, session_id: &str) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::storage(format!("Failed to create {}: {e}", parent.display())))?;
        }

        let body = serde_json::to_string(&SessionMarker {
            session_id: session_id.to_string(),
        })
        .map_err(|e| DomainError::internal(e.to_string()))?;

        tokio::fs::write(&self.path, body)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to write {}: {e}", self.path.display())))
    }

    /// Remove the marker; returns whether it existed
    pub async fn delete(&self) -> Result<bool, DomainError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(DomainError::storage(format!(
                "Failed to delete {}: {e}",
                self.path.display()
            ))),
        }
    }
}
