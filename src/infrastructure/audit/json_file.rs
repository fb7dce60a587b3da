//! Full-history JSON file audit log

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::warn;

use crate::domain::answer::{AuditLog, AuditRecord};
use crate::domain::DomainError;

/// Keeps the whole history as one pretty-printed JSON array.
///
/// Every append reads the file, pushes the record and rewrites the file.
/// Appends within this process are serialized; another process writing the
/// same file can still lose records (last write wins).
#[derive(Debug)]
pub struct JsonFileAuditLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileAuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing or blank file is an empty history. Undecodable JSON also reads
    /// as empty so the next append starts over; IO errors are returned.
    async fn read_all(&self) -> Result<Vec<AuditRecord>, DomainError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(DomainError::storage(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        Ok(serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "Audit log is not valid JSON, starting over");
            Vec::new()
        }))
    }

    async fn write_all(&self, records: &[AuditRecord]) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DomainError::storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let json = serde_json::to_vec_pretty(records)
            .map_err(|e| DomainError::storage(format!("Failed to serialize audit log: {}", e)))?;

        tokio::fs::write(&self.path, json).await.map_err(|e| {
            DomainError::storage(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }
}

#[async_trait]
impl AuditLog for JsonFileAuditLog {
    async fn append(&self, record: AuditRecord) -> Result<(), DomainError> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.read_all().await?;
        records.push(record);
        self.write_all(&records).await
    }

    async fn history(&self) -> Result<Vec<AuditRecord>, DomainError> {
        self.read_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::answer::AuditScores;
    use std::sync::Arc;

    fn record(query: &str) -> AuditRecord {
        AuditRecord::new(query, "answer", AuditScores { hallucination: 0.5, grade: 0.7 })
    }

    #[tokio::test]
    async fn test_append_accumulates_full_history() {
        let dir = tempfile::tempdir().unwrap();
        let log = JsonFileAuditLog::new(dir.path().join("data").join("state.json"));

        log.append(record("first")).await.unwrap();
        log.append(record("second")).await.unwrap();

        let history = log.history().await.unwrap();
        let queries: Vec<&str> = history.iter().map(|r| r.query.as_str()).collect();
        assert_eq!(queries, vec!["first", "second"]);

        let raw = std::fs::read_to_string(log.path()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
        assert_eq!(parsed[0]["scores"]["grade"].as_f64().map(|g| (g * 10.0).round()), Some(7.0));
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let log = JsonFileAuditLog::new(dir.path().join("missing.json"));
        assert!(log.history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_starts_over() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{not json").unwrap();

        let log = JsonFileAuditLog::new(&path);
        log.append(record("after")).await.unwrap();

        assert_eq!(log.history().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unreadable_log_is_left_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::create_dir(&path).unwrap();

        let log = JsonFileAuditLog::new(&path);

        assert!(matches!(
            log.append(record("lost")).await,
            Err(DomainError::Storage { .. })
        ));
        assert!(matches!(log.history().await, Err(DomainError::Storage { .. })));
        assert!(path.is_dir());
    }

    #[tokio::test]
    async fn test_concurrent_appends_in_process_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let log = Arc::new(JsonFileAuditLog::new(dir.path().join("state.json")));

        let tasks: Vec<_> = (0..10)
            .map(|i| {
                let log = log.clone();
                tokio::spawn(async move { log.append(record(&format!("q{i}"))).await })
            })
            .collect();

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(log.history().await.unwrap().len(), 10);
    }
}
