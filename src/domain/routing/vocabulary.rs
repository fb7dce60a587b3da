//! Keyword vocabularies used by the heuristic classifier

use serde::{Deserialize, Serialize};

const DOMAIN_TERMS: &[&str] = &[
    "ailayzer",
    "kurumsal",
    "hizmet",
    "şirket",
    "müşteri",
    "sözleşme",
    "ürün",
    "profil",
    "organizasyon",
];

const WEB_TERMS: &[&str] = &[
    "hava durumu",
    "bugün",
    "şu an",
    "güncel",
    "haber",
    "fiyat",
    "kur",
    "son durum",
    "yarın",
    "haftaya",
];

const CHITCHAT_TERMS: &[&str] = &[
    "merhaba",
    "selam",
    "naber",
    "ne yapabilirsin",
    "konuş",
    "kendini tanıt",
    "yardım edebilir misin",
    "sohbet",
];

const FOLLOW_UP_PHRASES: &[&str] = &[
    "what was my name",
    "what is my name",
    "continue",
    "remind me",
    "adım ne",
    "adımı",
    "hatırlıyor musun",
    "hatırlat",
    "devam et",
    "ne demiştim",
    "az önce",
];

fn owned(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|t| t.to_string()).collect()
}

/// Term lists matched as substrings of the lowercased query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingVocabulary {
    pub domain_terms: Vec<String>,
    pub web_terms: Vec<String>,
    pub chitchat_terms: Vec<String>,
    pub follow_up_phrases: Vec<String>,
}

impl Default for RoutingVocabulary {
    fn default() -> Self {
        Self {
            domain_terms: owned(DOMAIN_TERMS),
            web_terms: owned(WEB_TERMS),
            chitchat_terms: owned(CHITCHAT_TERMS),
            follow_up_phrases: owned(FOLLOW_UP_PHRASES),
        }
    }
}

/// True if any term occurs in `normalized`; terms are compared lowercased
pub(crate) fn contains_any(normalized: &str, terms: &[String]) -> bool {
    terms
        .iter()
        .map(|t| t.trim().to_lowercase())
        .any(|t| !t.is_empty() && normalized.contains(&t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_populated() {
        let vocab = RoutingVocabulary::default();
        assert!(vocab.domain_terms.contains(&"ailayzer".to_string()));
        assert!(vocab.web_terms.contains(&"hava durumu".to_string()));
        assert!(vocab.chitchat_terms.contains(&"merhaba".to_string()));
        assert!(vocab.follow_up_phrases.contains(&"remind me".to_string()));
    }

    #[test]
    fn test_contains_any_ignores_blank_terms() {
        let terms = vec!["".to_string(), "  ".to_string()];
        assert!(!contains_any("anything", &terms));
        assert!(contains_any("şirket profili", &["Şirket".to_string()]));
    }
}
