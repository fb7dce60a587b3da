//! In-memory audit log

use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::answer::{AuditLog, AuditRecord};
use crate::domain::DomainError;

/// Process-local history, useful for tests and ephemeral runs
#[derive(Debug, Default)]
pub struct InMemoryAuditLog {
    records: RwLock<Vec<AuditRecord>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuditLog for InMemoryAuditLog {
    async fn append(&self, record: AuditRecord) -> Result<(), DomainError> {
        let mut records = self.records.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        records.push(record);
        Ok(())
    }

    async fn history(&self) -> Result<Vec<AuditRecord>, DomainError> {
        let records = self.records.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(records.clone())
    }
}
