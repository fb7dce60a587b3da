//! Score functions

use serde::{Deserialize, Serialize};

use crate::domain::grading::{round_score, token_set, word_count};

/// Word count at which the length component of the grade saturates
const FULL_GRADE_WORDS: f32 = 80.0;
const CAPITALIZED_BONUS: f32 = 0.05;

/// Web answers over this many words get the full grade
const WEB_DETAILED_ANSWER_WORDS: usize = 30;

/// Faithfulness and quality scores, both in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnswerScores {
    pub hallucination: f32,
    pub grade: f32,
}

impl AnswerScores {
    pub fn new(hallucination: f32, grade: f32) -> Self {
        Self {
            hallucination,
            grade,
        }
    }

    /// Chat answers have no evidence to be unfaithful to
    pub fn chat() -> Self {
        Self::new(1.0, 1.0)
    }

    /// Lowest admissible scores, used when generation failed
    pub fn failed() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Scores for an answer grounded in retrieved documents
    pub fn grounded(answer: &str, context: &str) -> Self {
        Self::new(hallucination_score(answer, context), answer_grade(answer))
    }

    /// Fixed constants for web answers: search hits are already ranked by the
    /// provider, so only presence of context and answer length matter.
    pub fn web(context: &str, answer: &str) -> Self {
        let hallucination = if context.trim().is_empty() { 0.4 } else { 0.9 };
        let grade = if word_count(answer) > WEB_DETAILED_ANSWER_WORDS {
            1.0
        } else {
            0.6
        };
        Self::new(hallucination, grade)
    }
}

/// Share of distinct answer tokens that also occur in the context
pub fn hallucination_score(answer: &str, context: &str) -> f32 {
    let answer_tokens = token_set(answer);
    let context_tokens = token_set(context);

    if answer_tokens.is_empty() || context_tokens.is_empty() {
        return 0.0;
    }

    let supported = answer_tokens.intersection(&context_tokens).count();
    round_score(supported as f32 / answer_tokens.len() as f32)
}

/// `min(1, words / 80 + 0.05 if the answer starts uppercase)`
pub fn answer_grade(answer: &str) -> f32 {
    let trimmed = answer.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let length_part = word_count(trimmed) as f32 / FULL_GRADE_WORDS;
    let bonus = if trimmed.chars().next().is_some_and(char::is_uppercase) {
        CAPITALIZED_BONUS
    } else {
        0.0
    };

    round_score((length_part + bonus).min(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hallucination_empty_context_is_zero() {
        assert_eq!(hallucination_score("Any answer at all", ""), 0.0);
        assert_eq!(hallucination_score("", "context"), 0.0);
    }

    #[test]
    fn test_hallucination_fully_supported() {
        assert_eq!(
            hallucination_score("AILAYZER kurumsal hizmet", "ailayzer kurumsal hizmet verir"),
            1.0
        );
    }

    #[test]
    fn test_hallucination_partial_support_is_rounded() {
        // 1 of 3 tokens supported
        assert_eq!(hallucination_score("one two three", "one"), 0.33);
    }

    #[test]
    fn test_answer_grade_empty() {
        assert_eq!(answer_grade(""), 0.0);
        assert_eq!(answer_grade("   "), 0.0);
    }

    #[test]
    fn test_answer_grade_eighty_words_capitalized() {
        let answer = format!("Word {}", "word ".repeat(79));
        assert_eq!(answer_grade(&answer), 1.0);
    }

    #[test]
    fn test_answer_grade_short_lowercase() {
        // 8 words / 80
        assert_eq!(answer_grade("one two three four five six seven eight"), 0.1);
    }

    #[test]
    fn test_answer_grade_capital_bonus() {
        assert_eq!(answer_grade("One two three four five six seven eight"), 0.15);
    }

    #[test]
    fn test_web_scores() {
        let long_answer = "word ".repeat(31);

        assert_eq!(AnswerScores::web("", "short"), AnswerScores::new(0.4, 0.6));
        assert_eq!(AnswerScores::web("snippet", "short"), AnswerScores::new(0.9, 0.6));
        assert_eq!(
            AnswerScores::web("snippet", &long_answer),
            AnswerScores::new(0.9, 1.0)
        );
    }

    #[test]
    fn test_fixed_scores() {
        assert_eq!(AnswerScores::chat(), AnswerScores::new(1.0, 1.0));
        assert_eq!(AnswerScores::failed(), AnswerScores::new(0.0, 0.0));
    }
}
