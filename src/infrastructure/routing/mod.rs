//! Model-assisted routing

mod llm_classifier;

pub use llm_classifier::LlmClassifier;
