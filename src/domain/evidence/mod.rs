//! Evidence domain
//!
//! Documents retrieved from the knowledge base or the web, and the adapter
//! traits the pipeline uses to fetch them.

mod document;
mod source;

pub use document::{EvidenceOrigin, RetrievedDocument};
pub use source::{SemanticRetriever, WebSearcher};

#[cfg(test)]
pub use source::mock::{MockSemanticRetriever, MockWebSearcher};
