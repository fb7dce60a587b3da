//! Word tokenization shared by grading and answer assessment

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

/// Distinct lowercase word tokens of `text`.
///
/// A token is a maximal run of Unicode word characters, so Turkish letters
/// such as `ş` or `ı` stay inside their words.
pub fn token_set(text: &str) -> HashSet<String> {
    let lowered = text.to_lowercase();
    WORD_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Whitespace separated word count
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Round a score to two decimals
pub fn round_score(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_set_lowercases_and_dedups() {
        let tokens = token_set("Hizmet hizmet, HIZMET sözleşmesi!");
        assert!(tokens.contains("hizmet"));
        assert!(tokens.contains("sözleşmesi"));
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_token_set_empty() {
        assert!(token_set("").is_empty());
        assert!(token_set("  ?! ").is_empty());
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("one two  three\nfour"), 4);
        assert_eq!(word_count("   "), 0);
    }

    #[test]
    fn test_round_score() {
        assert_eq!(round_score(0.666_666), 0.67);
        assert_eq!(round_score(1.0), 1.0);
        assert_eq!(round_score(0.0), 0.0);
    }
}
