//! Query routing domain
//!
//! A query is classified into one of three answer strategies by an ordered
//! chain of classifier strategies. The first strategy with an opinion wins;
//! when none has one the query is treated as generic chat.

mod route;
mod router;
mod strategy;
mod vocabulary;

pub use route::{Route, RouteDecision};
pub use router::{FollowUpRule, QueryRouter};
pub use strategy::{ClassifierStrategy, KeywordClassifier};
pub use vocabulary::RoutingVocabulary;

#[cfg(test)]
pub use strategy::mock::FixedClassifier;
