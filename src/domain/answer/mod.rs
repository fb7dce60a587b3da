//! Answer results and the audit trail

mod audit;
mod result;

pub use audit::{AuditLog, AuditRecord, AuditScores};
pub use result::{AnswerResult, SourceTag, DOMAIN_FAILURE_ANSWER, WEB_FAILURE_ANSWER};

#[cfg(test)]
pub use audit::MockAuditLog;
