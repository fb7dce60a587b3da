//! Query embedding domain

mod provider;

pub use provider::EmbeddingProvider;

#[cfg(test)]
pub use provider::mock::MockEmbeddingProvider;
