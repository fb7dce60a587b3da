//! Routed answer pipeline
//!
//! Classifies the query, gathers evidence for the chosen route, generates the
//! answer and scores it. DOMAIN queries whose retrieval grades empty get one
//! rewrite attempt and then fall back to web search.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use futures::StreamExt;
use serde::Serialize;
use tokio::sync::{mpsc, OwnedMutexGuard};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};

use super::generator::Generator;
use super::prompt::PromptBuilder;
use super::stream::StreamEvent;
use crate::domain::answer::{AnswerResult, AuditLog, AuditRecord, SourceTag};
use crate::domain::assessment::AnswerScores;
use crate::domain::evidence::{SemanticRetriever, WebSearcher};
use crate::domain::grading::{GradedDocument, RelevanceGrader};
use crate::domain::memory::{ConversationMemory, SessionStore, TranscriptEntry};
use crate::domain::query::{validate_query_text, RagQuery};
use crate::domain::routing::{QueryRouter, Route, RouteDecision};
use crate::domain::{DomainError, LlmRequest};
use crate::infrastructure::observability::{
    record_generation_failure, record_rag_request, record_rewrite, record_route,
    record_web_fallback,
};

/// Events buffered between the producer task and a slow consumer
const STREAM_BUFFER: usize = 64;

/// Retrieval and context sizing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Documents requested from the retriever
    pub top_k: usize,
    /// Best graded documents joined into the generation context
    pub context_documents: usize,
    /// Web snippets joined into the generation context
    pub web_context_snippets: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            top_k: 4,
            context_documents: 2,
            web_context_snippets: 3,
        }
    }
}

/// Recent turns and summary of one session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionTranscript {
    pub session_id: String,
    pub summary: String,
    pub messages: Vec<TranscriptEntry>,
}

/// Everything needed to generate and score an answer
#[derive(Debug)]
struct AnswerPlan {
    route: Route,
    source: SourceTag,
    request: LlmRequest,
    context: String,
    evidence: Vec<String>,
}

type MemoryGuard = OwnedMutexGuard<ConversationMemory>;

pub struct RagPipeline {
    router: QueryRouter,
    retriever: Arc<dyn SemanticRetriever>,
    web: Arc<dyn WebSearcher>,
    grader: RelevanceGrader,
    generator: Generator,
    prompts: PromptBuilder,
    sessions: Arc<SessionStore>,
    audit: Option<Arc<dyn AuditLog>>,
    settings: PipelineSettings,
}

impl fmt::Debug for RagPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RagPipeline")
            .field("strategies", &self.router.strategy_names())
            .field("retriever", &self.retriever.backend_name())
            .field("web", &self.web.provider_name())
            .field("model", &self.generator.model())
            .field("audit", &self.audit.is_some())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl RagPipeline {
    pub fn new(
        router: QueryRouter,
        retriever: Arc<dyn SemanticRetriever>,
        web: Arc<dyn WebSearcher>,
        generator: Generator,
        sessions: Arc<SessionStore>,
    ) -> Self {
        Self {
            router,
            retriever,
            web,
            grader: RelevanceGrader::default(),
            generator,
            prompts: PromptBuilder::default(),
            sessions,
            audit: None,
            settings: PipelineSettings::default(),
        }
    }

    pub fn with_grader(mut self, grader: RelevanceGrader) -> Self {
        self.grader = grader;
        self
    }

    pub fn with_prompts(mut self, prompts: PromptBuilder) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn with_audit(mut self, audit: Arc<dyn AuditLog>) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn with_settings(mut self, settings: PipelineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Answer a query in one shot
    pub async fn run(&self, query: RagQuery) -> Result<AnswerResult, DomainError> {
        validate_query_text(&query.text)?;
        let started = Instant::now();

        let memory = self.lock_memory(&query).await;
        let history = memory
            .as_ref()
            .map(|m| m.build_context())
            .unwrap_or_default();

        let decision = self.route(&query.text).await;
        let plan = self.plan(decision, &history).await;

        let (answer, failed) = match self.generator.generate(plan.request.clone()).await {
            Ok(answer) => (answer, false),
            Err(e) => {
                warn!(source = %plan.source, error = %e, "Generation failed");
                (plan.source.failure_answer().to_string(), true)
            }
        };

        let result = Self::finish(&query.text, plan, answer, failed);
        self.record(memory, &result, started).await;

        Ok(result)
    }

    /// Answer a query as a stream of events.
    ///
    /// Work happens in a spawned task. If the consumer goes away the task
    /// stops emitting but still drains generation and records the turn.
    pub fn stream(
        self: &Arc<Self>,
        query: RagQuery,
    ) -> Result<ReceiverStream<StreamEvent>, DomainError> {
        validate_query_text(&query.text)?;

        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        let pipeline = Arc::clone(self);
        tokio::spawn(async move {
            pipeline.produce_stream(query, EventSink::new(tx)).await;
        });

        Ok(ReceiverStream::new(rx))
    }

    async fn produce_stream(&self, query: RagQuery, mut sink: EventSink) {
        let started = Instant::now();
        sink.send(StreamEvent::Started).await;

        let memory = self.lock_memory(&query).await;
        let history = memory
            .as_ref()
            .map(|m| m.build_context())
            .unwrap_or_default();

        let decision = self.route(&query.text).await;
        let plan = self.plan(decision, &history).await;

        let mut answer = String::new();
        let mut failed = false;

        match self.generator.generate_stream(plan.request.clone()).await {
            Ok(mut increments) => {
                while let Some(increment) = increments.next().await {
                    match increment {
                        Ok(text) => {
                            answer.push_str(&text);
                            sink.send(StreamEvent::Delta(text)).await;
                            tokio::task::yield_now().await;
                        }
                        Err(e) => {
                            warn!(source = %plan.source, error = %e, "Generation stream failed");
                            failed = true;
                            break;
                        }
                    }
                }
            }
            Err(e) => {
                warn!(source = %plan.source, error = %e, "Generation stream could not start");
                failed = true;
            }
        }

        if !failed && answer.trim().is_empty() {
            warn!(source = %plan.source, "Generation stream produced no text");
            failed = true;
        }

        if failed {
            answer = plan.source.failure_answer().to_string();
            sink.send(StreamEvent::Error(answer.clone())).await;
        }

        let result = Self::finish(&query.text, plan, answer.trim().to_string(), failed);
        self.record(memory, &result, started).await;

        sink.send(StreamEvent::Completed(Box::new(result))).await;
        sink.send(StreamEvent::Done).await;
    }

    async fn lock_memory(&self, query: &RagQuery) -> Option<MemoryGuard> {
        let session_id = query.session_id.as_deref()?;
        let handle = self.sessions.get_or_create(session_id).await;
        Some(handle.lock_owned().await)
    }

    async fn route(&self, query: &str) -> RouteDecision {
        let decision = self.router.route(query).await;
        record_route(decision.route);
        info!(route = %decision.route, query = %decision.query, "Query routed");
        decision
    }

    async fn plan(&self, decision: RouteDecision, history: &str) -> AnswerPlan {
        match decision.route {
            Route::GenericChat => AnswerPlan {
                route: Route::GenericChat,
                source: SourceTag::GenericLlm,
                request: self.prompts.chat(history, &decision.query),
                context: String::new(),
                evidence: Vec::new(),
            },
            Route::Web => self.plan_web(Route::Web, &decision.query, history).await,
            Route::Domain => self.plan_domain(&decision.query, history).await,
        }
    }

    async fn plan_web(&self, route: Route, query: &str, history: &str) -> AnswerPlan {
        let snippets: Vec<String> = self
            .web
            .retrieve_web(query)
            .await
            .into_iter()
            .map(|doc| doc.content().to_string())
            .collect();

        let context = snippets
            .iter()
            .take(self.settings.web_context_snippets)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");
        debug!(snippets = snippets.len(), "Web evidence gathered");

        AnswerPlan {
            route,
            source: SourceTag::WebSearch,
            request: self.prompts.web(history, &context, query),
            context,
            evidence: snippets,
        }
    }

    async fn plan_domain(&self, query: &str, history: &str) -> AnswerPlan {
        let mut working = query.to_string();
        let mut graded = self.retrieve_and_grade(&working).await;

        if graded.is_empty() {
            info!("No relevant documents, attempting one rewrite");
            if let Some(rewritten) = self.rewrite(&working).await {
                record_rewrite();
                info!(rewritten = %rewritten, "Retrying retrieval with rewritten query");
                graded = self.retrieve_and_grade(&rewritten).await;
                working = rewritten;
            }
        }

        if graded.is_empty() {
            warn!("No relevant documents after rewrite, falling back to web search");
            record_web_fallback();
            return self.plan_web(Route::Domain, &working, history).await;
        }

        let context = graded
            .iter()
            .take(self.settings.context_documents)
            .map(GradedDocument::content)
            .collect::<Vec<_>>()
            .join(" ");
        let evidence = graded.iter().map(|g| g.content().to_string()).collect();

        AnswerPlan {
            route: Route::Domain,
            source: SourceTag::ChromaDb,
            request: self.prompts.domain(history, &context, &working),
            context,
            evidence,
        }
    }

    async fn rewrite(&self, query: &str) -> Option<String> {
        if !self.generator.provider().has_credential() {
            debug!("No model credential, skipping rewrite");
            return None;
        }
        self.generator.rewrite(&self.prompts, query).await
    }

    /// Retrieval errors count as an empty result
    async fn retrieve_and_grade(&self, query: &str) -> Vec<GradedDocument> {
        let docs = match self
            .retriever
            .retrieve_semantic(query, self.settings.top_k)
            .await
        {
            Ok(docs) => docs,
            Err(e) => {
                warn!(backend = self.retriever.backend_name(), error = %e, "Retrieval failed");
                Vec::new()
            }
        };

        let retrieved = docs.len();
        let graded = self.grader.filter_and_rank(query, docs);
        debug!(
            retrieved,
            relevant = graded.len(),
            top_score = graded.first().map(|g| g.score),
            "Documents graded"
        );
        graded
    }

    fn score(plan: &AnswerPlan, answer: &str, failed: bool) -> AnswerScores {
        match plan.source {
            SourceTag::WebSearch => AnswerScores::web(&plan.context, answer),
            _ if failed => AnswerScores::failed(),
            SourceTag::GenericLlm => AnswerScores::chat(),
            SourceTag::ChromaDb => AnswerScores::grounded(answer, &plan.context),
        }
    }

    fn finish(query: &str, plan: AnswerPlan, answer: String, failed: bool) -> AnswerResult {
        let scores = Self::score(&plan, &answer, failed);
        let result = AnswerResult::new(query, plan.route, plan.source, answer, scores)
            .with_evidence(plan.evidence);

        if failed {
            record_generation_failure(result.source);
            result.failed()
        } else {
            result
        }
    }

    /// Memory update (successful answers only), audit append, metrics
    async fn record(&self, memory: Option<MemoryGuard>, result: &AnswerResult, started: Instant) {
        if let Some(mut memory) = memory {
            if !result.generation_failed {
                memory.add_turn(result.query.clone(), result.answer.clone()).await;
            }
        }

        if let Some(ref audit) = self.audit {
            if let Err(e) = audit.append(AuditRecord::from(result)).await {
                warn!(error = %e, "Failed to write audit record");
            }
        }

        record_rag_request(result.source, started.elapsed());
        info!(
            source = %result.source,
            hallucination = result.hallucination_score,
            grade = result.answer_grade,
            evidence = result.evidence.len(),
            failed = result.generation_failed,
            "Answer produced"
        );
    }

    /// Drop a session's memory; returns whether it existed
    pub async fn reset_session(&self, session_id: &str) -> bool {
        self.sessions.reset(session_id).await
    }

    /// Transcript of an existing session
    pub async fn transcript(&self, session_id: &str) -> Option<SessionTranscript> {
        let handle = self.sessions.get(session_id).await?;
        let memory = handle.lock().await;

        Some(SessionTranscript {
            session_id: session_id.to_string(),
            summary: memory.summary().to_string(),
            messages: memory.transcript(),
        })
    }

    /// Audit history; empty when auditing is disabled
    pub async fn history(&self) -> Result<Vec<AuditRecord>, DomainError> {
        match self.audit {
            Some(ref audit) => audit.history().await,
            None => Ok(Vec::new()),
        }
    }
}

/// Sender side of a stream that tolerates a vanished consumer
struct EventSink {
    tx: mpsc::Sender<StreamEvent>,
    open: bool,
}

impl EventSink {
    fn new(tx: mpsc::Sender<StreamEvent>) -> Self {
        Self { tx, open: true }
    }

    async fn send(&mut self, event: StreamEvent) {
        if !self.open {
            return;
        }

        if self.tx.send(event).await.is_err() {
            self.open = false;
            debug!("Stream consumer disconnected, finishing in background");
        }
    }
}
