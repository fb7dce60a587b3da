//! AILAYZER routed RAG service
//!
//! Answers questions from one of three sources:
//! - the language model alone, for chit-chat
//! - web search snippets, for current events
//! - a vector store of company documents, with one query rewrite and a web
//!   fallback when nothing relevant is found
//!
//! Each session keeps a summarizing conversation memory and every answer is
//! scored and appended to an audit log.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use config::RetrievalBackend;
use domain::memory::MemoryLimits;
use domain::routing::{ClassifierStrategy, FollowUpRule, KeywordClassifier, QueryRouter};
use domain::{AuditLog, LlmProvider, RelevanceGrader, SemanticRetriever, SessionStore, WebSearcher};
use infrastructure::audit::JsonFileAuditLog;
use infrastructure::embedding::OpenAiEmbeddingProvider;
use infrastructure::evidence::{ChromaRetriever, InMemoryRetriever, TavilySearcher};
use infrastructure::llm::{HttpClient, LlmProviderConfig, LlmProviderFactory};
use infrastructure::memory::LlmSummarizer;
use infrastructure::rag::{Generator, PipelineSettings, PromptBuilder, RagPipeline};
use infrastructure::routing::LlmClassifier;
use tracing::{info, warn};

/// Create the application state with default configuration
pub fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default())
}

/// Create the application state with custom configuration
pub fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    Ok(AppState::new(create_pipeline(config)?))
}

/// Wire adapters, memory and audit log into a pipeline
pub fn create_pipeline(config: &AppConfig) -> anyhow::Result<Arc<RagPipeline>> {
    let provider = LlmProviderFactory::create(&LlmProviderConfig {
        base_url: config.llm.base_url.clone(),
        api_key: config.llm.api_key.clone(),
        timeout: config.llm.timeout(),
    })?;

    if !provider.has_credential() {
        warn!("No LLM credential configured: routing is keyword-only and generation will fail");
    }

    let router = create_router(config, provider.clone());
    let retriever = create_retriever(config)?;
    let web = create_web_searcher(config)?;

    let sessions = Arc::new(
        SessionStore::new(MemoryLimits {
            max_token_limit: config.memory.max_token_limit,
            min_recent_turns: config.memory.min_recent_turns,
        })
        .with_summarizer(Arc::new(LlmSummarizer::new(
            provider.clone(),
            config.llm.model.clone(),
        ))),
    );

    let generator =
        Generator::new(provider, config.llm.model.clone()).with_temperature(config.llm.temperature);

    let mut pipeline = RagPipeline::new(router, retriever, web, generator, sessions)
        .with_grader(RelevanceGrader::new(config.retrieval.min_relevance))
        .with_prompts(PromptBuilder::new(config.llm.answer_language.clone()))
        .with_settings(PipelineSettings {
            top_k: config.retrieval.top_k,
            context_documents: config.retrieval.context_documents,
            web_context_snippets: config.web_search.context_snippets,
        });

    if config.audit.enabled {
        let audit: Arc<dyn AuditLog> = Arc::new(JsonFileAuditLog::new(&config.audit.path));
        pipeline = pipeline.with_audit(audit);
    }

    info!(
        model = %config.llm.model,
        retrieval = ?config.retrieval.backend,
        audit = config.audit.enabled,
        "RAG pipeline created"
    );

    Ok(Arc::new(pipeline))
}

fn create_router(config: &AppConfig, provider: Arc<dyn LlmProvider>) -> QueryRouter {
    let routing = &config.routing;
    let strategies: Vec<Arc<dyn ClassifierStrategy>> = vec![
        Arc::new(KeywordClassifier::new(
            routing.vocabulary.clone(),
            routing.short_query_chars,
        )),
        Arc::new(LlmClassifier::new(provider, config.llm.model.clone())),
    ];

    QueryRouter::new(strategies).with_follow_up(FollowUpRule::new(
        routing.vocabulary.follow_up_phrases.clone(),
        routing.follow_up_max_words,
    ))
}

fn create_retriever(config: &AppConfig) -> anyhow::Result<Arc<dyn SemanticRetriever>> {
    let retrieval = &config.retrieval;

    match retrieval.backend {
        RetrievalBackend::InMemory => {
            info!(documents = retrieval.documents.len(), "Using in-memory retriever");
            Ok(Arc::new(InMemoryRetriever::with_documents(
                retrieval.documents.iter().cloned(),
            )))
        }
        RetrievalBackend::Chroma => {
            let embedder = Arc::new(OpenAiEmbeddingProvider::new(
                HttpClient::with_timeout(config.llm.timeout())?,
                config.embedding_api_key(),
                config.embedding_base_url(),
                retrieval.embedding_model.clone(),
            ));

            info!(url = %retrieval.chroma_url, collection = %retrieval.collection, "Using Chroma retriever");
            Ok(Arc::new(ChromaRetriever::new(
                HttpClient::with_timeout(config.llm.timeout())?,
                retrieval.chroma_url.clone(),
                retrieval.collection.clone(),
                embedder,
            )))
        }
    }
}

fn create_web_searcher(config: &AppConfig) -> anyhow::Result<Arc<dyn WebSearcher>> {
    let web = &config.web_search;
    if web.api_key.trim().is_empty() {
        warn!("No web search credential configured: web evidence will be empty");
    }

    Ok(Arc::new(
        TavilySearcher::with_base_url(
            HttpClient::with_timeout(web.timeout())?,
            web.api_key.clone(),
            web.base_url.clone(),
        )
        .with_max_results(web.max_results),
    ))
}
