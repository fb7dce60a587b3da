//! Memory adapters

mod llm_summarizer;

pub use llm_summarizer::LlmSummarizer;
