//! Classifier strategies

use async_trait::async_trait;
use std::fmt::Debug;

use super::vocabulary::contains_any;
use super::{Route, RoutingVocabulary};

/// One link in the routing chain.
///
/// Returns `None` when the strategy has no opinion; the router then asks the
/// next strategy. Strategies never fail: a strategy whose backend errors
/// simply has no opinion.
#[async_trait]
pub trait ClassifierStrategy: Send + Sync + Debug {
    async fn classify(&self, query: &str) -> Option<Route>;

    fn strategy_name(&self) -> &'static str;
}

/// Cheap deterministic vocabulary classifier
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    vocabulary: RoutingVocabulary,
    short_query_chars: usize,
}

impl KeywordClassifier {
    pub fn new(vocabulary: RoutingVocabulary, short_query_chars: usize) -> Self {
        Self {
            vocabulary,
            short_query_chars,
        }
    }

    /// Synchronous core; DOMAIN terms are checked first, then WEB terms,
    /// then chitchat terms or a short query length.
    pub fn classify_text(&self, query: &str) -> Option<Route> {
        let normalized = query.trim().to_lowercase();

        if contains_any(&normalized, &self.vocabulary.domain_terms) {
            return Some(Route::Domain);
        }

        if contains_any(&normalized, &self.vocabulary.web_terms) {
            return Some(Route::Web);
        }

        if contains_any(&normalized, &self.vocabulary.chitchat_terms)
            || normalized.chars().count() <= self.short_query_chars
        {
            return Some(Route::GenericChat);
        }

        None
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new(RoutingVocabulary::default(), 10)
    }
}

#[async_trait]
impl ClassifierStrategy for KeywordClassifier {
    async fn classify(&self, query: &str) -> Option<Route> {
        self.classify_text(query)
    }

    fn strategy_name(&self) -> &'static str {
        "keyword"
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_terms() {
        let classifier = KeywordClassifier::default();
        assert_eq!(
            classifier.classify_text("AILAYZER kurumsal hizmetleri nelerdir?"),
            Some(Route::Domain)
        );
    }

    #[test]
    fn test_domain_checked_before_web() {
        let classifier = KeywordClassifier::default();
        assert_eq!(
            classifier.classify_text("bugün şirket ne duyurdu acaba"),
            Some(Route::Domain)
        );
    }

    #[test]
    fn test_web_terms() {
        let classifier = KeywordClassifier::default();
        assert_eq!(
            classifier.classify_text("hava durumu nasıl"),
            Some(Route::Web)
        );
        assert_eq!(
            classifier.classify_text("dolar fiyatı ne kadar oldu"),
            Some(Route::Web)
        );
    }

    #[test]
    fn test_chitchat_terms() {
        let classifier = KeywordClassifier::default();
        assert_eq!(
            classifier.classify_text("Merhaba, ne yapabilirsin bana anlat"),
            Some(Route::GenericChat)
        );
    }

    #[test]
    fn test_short_query_is_chat() {
        let classifier = KeywordClassifier::default();
        assert_eq!(classifier.classify_text("  why?  "), Some(Route::GenericChat));
        // exactly ten characters, counted as scalars not bytes
        assert_eq!(classifier.classify_text("çççççççççç"), Some(Route::GenericChat));
    }

    #[test]
    fn test_no_opinion() {
        let classifier = KeywordClassifier::default();
        assert_eq!(
            classifier.classify_text("explain quantum entanglement simply"),
            None
        );
    }

    #[tokio::test]
    async fn test_strategy_trait() {
        let classifier = KeywordClassifier::default();
        assert_eq!(classifier.classify("selam").await, Some(Route::GenericChat));
        assert_eq!(classifier.strategy_name(), "keyword");
    }

    #[test]
    fn test_fixed_classifier_counts_calls() {
        let fixed = mock::FixedClassifier::new(Some(Route::Web));
        assert_eq!(tokio_test::block_on(fixed.classify("x")), Some(Route::Web));
        assert_eq!(fixed.call_count(), 1);
    }
}
