//! Infrastructure layer - External service implementations

pub mod audit;
pub mod embedding;
pub mod evidence;
pub mod llm;
pub mod logging;
pub mod memory;
pub mod observability;
pub mod rag;
pub mod routing;
pub mod session_file;
