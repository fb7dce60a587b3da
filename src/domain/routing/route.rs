//! Route tags

use serde::{Deserialize, Serialize};
use std::fmt;

/// Answer strategy chosen for a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Route {
    /// Local knowledge base retrieval
    Domain,
    /// Web search augmented generation
    Web,
    /// Plain model chat with conversation memory only
    GenericChat,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Domain => "DOMAIN",
            Self::Web => "WEB",
            Self::GenericChat => "GENERIC_CHAT",
        }
    }

    /// Parse a free-form model reply into a route.
    ///
    /// Substring match on the upper-cased reply; `DOMAIN` is checked before
    /// `WEB`, so an echoed `route=DOMAIN|WEB|GENERIC_CHAT` reads as DOMAIN.
    pub fn from_label(raw: &str) -> Option<Self> {
        let upper = raw.trim().to_uppercase();

        if upper.contains("DOMAIN") {
            Some(Self::Domain)
        } else if upper.contains("WEB") {
            Some(Self::Web)
        } else if upper.contains("GENERIC_CHAT") {
            Some(Self::GenericChat)
        } else {
            None
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of routing a single query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDecision {
    pub route: Route,
    /// Query text the selected branch works with
    pub query: String,
}

impl RouteDecision {
    pub fn new(route: Route, query: impl Into<String>) -> Self {
        Self {
            route,
            query: query.into(),
        }
    }
}
