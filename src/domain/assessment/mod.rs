//! Answer self-assessment
//!
//! Heuristic faithfulness and quality scores attached to every answer.
//! These are cheap lexical proxies, not ground truth: a paraphrased but
//! faithful answer scores low on faithfulness, and a long rambling answer
//! scores high on quality.

mod scores;

pub use scores::{AnswerScores, answer_grade, hallucination_score};
