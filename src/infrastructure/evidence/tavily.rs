//! Tavily web search

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::evidence::{RetrievedDocument, WebSearcher};
use crate::infrastructure::llm::HttpClientTrait;

pub const DEFAULT_TAVILY_URL: &str = "https://api.tavily.com";

/// Web snippets from the Tavily search API.
///
/// Failures never reach the caller: a missing key, a transport error or an
/// unexpected payload all yield an empty result and a warning.
#[derive(Debug)]
pub struct TavilySearcher<C: HttpClientTrait> {
    client: C,
    api_key: String,
    base_url: String,
    max_results: usize,
}

impl<C: HttpClientTrait> TavilySearcher<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_TAVILY_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_results: 5,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.base_url)
    }
}

#[async_trait]
impl<C: HttpClientTrait> WebSearcher for TavilySearcher<C> {
    async fn retrieve_web(&self, query: &str) -> Vec<RetrievedDocument> {
        if self.api_key.trim().is_empty() {
            warn!("Web search skipped: no Tavily API key configured");
            return Vec::new();
        }

        let body = serde_json::json!({
            "api_key": self.api_key,
            "query": query,
            "max_results": self.max_results,
        });
        let headers = vec![("Content-Type", "application/json")];

        let json = match self.client.post_json(&self.search_url(), headers, &body).await {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Web search failed");
                return Vec::new();
            }
        };

        let response: TavilyResponse = match serde_json::from_value(json) {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Unexpected web search response");
                return Vec::new();
            }
        };

        let docs: Vec<RetrievedDocument> = response
            .results
            .into_iter()
            .filter(|r| !r.content.trim().is_empty())
            .map(|r| RetrievedDocument::web(r.content).with_link(r.title, r.url))
            .collect();

        debug!(count = docs.len(), "Web search returned");
        docs
    }

    fn provider_name(&self) -> &'static str {
        "tavily"
    }
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    title: Option<String>,
    url: Option<String>,
    #[serde(default)]
    content: String,
}
