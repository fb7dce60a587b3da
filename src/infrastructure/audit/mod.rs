//! Audit log adapters

mod in_memory;
mod json_file;

pub use in_memory::InMemoryAuditLog;
pub use json_file::JsonFileAuditLog;
