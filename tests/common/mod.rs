//! Stub adapters shared by the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use ailayzer_rag::domain::routing::{FollowUpRule, KeywordClassifier, QueryRouter, RoutingVocabulary};
use ailayzer_rag::domain::{
    DomainError, FinishReason, LlmProvider, LlmRequest, LlmResponse, LlmStream, Message,
    RetrievedDocument, SemanticRetriever, SessionStore, StreamChunk, WebSearcher,
};
use ailayzer_rag::infrastructure::audit::InMemoryAuditLog;
use ailayzer_rag::infrastructure::rag::{Generator, RagPipeline};
use async_trait::async_trait;
use futures::stream;

/// Replies are consumed in order; the last one repeats
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<String>>,
    last: Mutex<Option<String>>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl ScriptedProvider {
    pub fn replying(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next(&self) -> Option<String> {
        let mut replies = self.replies.lock().unwrap();
        let mut last = self.last.lock().unwrap();
        if let Some(reply) = replies.pop_front() {
            *last = Some(reply);
        }
        last.clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError> {
        self.requests.lock().unwrap().push(request);
        match self.next() {
            Some(text) => Ok(LlmResponse::new("stub", model, Message::assistant(text))),
            None => Err(DomainError::provider("stub", "no reply scripted")),
        }
    }

    async fn chat_stream(&self, model: &str, request: LlmRequest) -> Result<LlmStream, DomainError> {
        let text = self.chat(model, request).await?.content().to_string();
        let mut chunks: Vec<Result<StreamChunk, DomainError>> = text
            .split_inclusive(' ')
            .map(|word| Ok(StreamChunk::new("stub", model).with_delta(word)))
            .collect();
        chunks.push(Ok(StreamChunk::new("stub", model).with_finish_reason(FinishReason::Stop)));
        Ok(Box::pin(stream::iter(chunks)))
    }

    fn provider_name(&self) -> &'static str {
        "stub"
    }
}

/// Returns the same documents for every query and counts calls
#[derive(Debug, Default)]
pub struct StubRetriever {
    documents: Vec<String>,
    queries: Mutex<Vec<String>>,
}

impl StubRetriever {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_documents(documents: &[&str]) -> Self {
        Self {
            documents: documents.iter().map(|d| d.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl SemanticRetriever for StubRetriever {
    async fn retrieve_semantic(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<RetrievedDocument>, DomainError> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(self
            .documents
            .iter()
            .take(k)
            .map(|d| RetrievedDocument::collection("stub", d.clone()))
            .collect())
    }

    fn backend_name(&self) -> &'static str {
        "stub"
    }
}

#[derive(Debug, Default)]
pub struct StubWebSearcher {
    snippets: Vec<String>,
    queries: Mutex<Vec<String>>,
}

impl StubWebSearcher {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_snippets(snippets: &[&str]) -> Self {
        Self {
            snippets: snippets.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebSearcher for StubWebSearcher {
    async fn retrieve_web(&self, query: &str) -> Vec<RetrievedDocument> {
        self.queries.lock().unwrap().push(query.to_string());
        self.snippets.iter().map(|s| RetrievedDocument::web(s.clone())).collect()
    }

    fn provider_name(&self) -> &'static str {
        "stub"
    }
}

pub struct Harness {
    pub provider: Arc<ScriptedProvider>,
    pub retriever: Arc<StubRetriever>,
    pub web: Arc<StubWebSearcher>,
    pub audit: Arc<InMemoryAuditLog>,
    pub pipeline: Arc<RagPipeline>,
}

impl Harness {
    pub fn new(provider: ScriptedProvider, retriever: StubRetriever, web: StubWebSearcher) -> Self {
        let provider = Arc::new(provider);
        let retriever = Arc::new(retriever);
        let web = Arc::new(web);
        let audit = Arc::new(InMemoryAuditLog::new());

        let vocabulary = RoutingVocabulary::default();
        let router = QueryRouter::new(vec![Arc::new(KeywordClassifier::default())])
            .with_follow_up(FollowUpRule::new(vocabulary.follow_up_phrases, 6));

        let pipeline = RagPipeline::new(
            router,
            retriever.clone(),
            web.clone(),
            Generator::new(provider.clone(), "stub-model"),
            Arc::new(SessionStore::default()),
        )
        .with_audit(audit.clone());

        Self {
            provider,
            retriever,
            web,
            audit,
            pipeline: Arc::new(pipeline),
        }
    }
}
