//! Relevance grading domain
//!
//! Lexical scoring of candidate evidence against a query. Grading output is
//! what the pipeline inspects to decide between answering, rewriting the
//! query, and falling back to web search.

mod grader;
mod tokens;

pub use grader::{GradedDocument, RelevanceGrader, DEFAULT_MIN_RELEVANCE};
pub use tokens::{round_score, token_set, word_count};
