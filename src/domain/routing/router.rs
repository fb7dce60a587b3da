//! Strategy chain router with follow-up override

use std::sync::Arc;

use tracing::debug;

use super::vocabulary::contains_any;
use super::{ClassifierStrategy, Route, RouteDecision};
use crate::domain::grading::word_count;

/// Forces short personal-continuity questions onto the chat route.
///
/// Such questions ("what was my name", "devam et") can match a domain term
/// by accident but are answered from conversation memory, not documents.
#[derive(Debug, Clone)]
pub struct FollowUpRule {
    phrases: Vec<String>,
    max_words: usize,
}

impl FollowUpRule {
    pub fn new(phrases: Vec<String>, max_words: usize) -> Self {
        Self { phrases, max_words }
    }

    pub fn matches(&self, query: &str) -> bool {
        let normalized = query.trim().to_lowercase();
        word_count(&normalized) <= self.max_words && contains_any(&normalized, &self.phrases)
    }
}

/// Ordered chain of classifier strategies
#[derive(Debug, Clone)]
pub struct QueryRouter {
    strategies: Vec<Arc<dyn ClassifierStrategy>>,
    follow_up: Option<FollowUpRule>,
}

impl QueryRouter {
    pub fn new(strategies: Vec<Arc<dyn ClassifierStrategy>>) -> Self {
        Self {
            strategies,
            follow_up: None,
        }
    }

    pub fn with_follow_up(mut self, rule: FollowUpRule) -> Self {
        self.follow_up = Some(rule);
        self
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.strategy_name()).collect()
    }

    /// Classify a query; never fails and defaults to GENERIC_CHAT
    pub async fn route(&self, query: &str) -> RouteDecision {
        let normalized = query.trim().to_string();
        let mut route = Route::GenericChat;

        for strategy in &self.strategies {
            if let Some(decided) = strategy.classify(&normalized).await {
                debug!(strategy = strategy.strategy_name(), route = %decided, "Route decided");
                route = decided;
                break;
            }
        }

        if route == Route::Domain
            && self
                .follow_up
                .as_ref()
                .is_some_and(|rule| rule.matches(&normalized))
        {
            debug!("Follow-up question, using conversation memory instead of retrieval");
            route = Route::GenericChat;
        }

        RouteDecision::new(route, normalized)
    }
}
