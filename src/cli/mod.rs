//! CLI module
//!
//! Subcommands:
//! - `serve`: HTTP API server
//! - `ask`: answer one question, optionally streamed
//! - `chat`: interactive question loop
//! - `reset-session`: forget the persisted session id

pub mod ask;
pub mod chat;
pub mod reset;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;
use crate::infrastructure::session_file::SessionFile;

/// AILAYZER RAG - routed question answering over documents, web and chat
#[derive(Parser)]
#[command(name = "ailayzer-rag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Answer a single question
    Ask(ask::AskArgs),

    /// Interactive question loop; `exit` or `quit` leaves
    Chat(chat::ChatArgs),

    /// Delete the persisted session id
    ResetSession,
}

/// Load configuration and install logging; shared by every subcommand
pub(crate) fn bootstrap() -> AppConfig {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Invalid configuration, using defaults: {e}");
        AppConfig::default()
    });
    logging::init_logging(&config.logging);
    config
}

/// Explicit `--session` wins over the marker file
pub(crate) async fn resolve_session(
    config: &AppConfig,
    explicit: Option<String>,
) -> anyhow::Result<String> {
    match explicit {
        Some(id) => Ok(id),
        None => Ok(SessionFile::new(&config.session.marker_file)
            .load_or_create()
            .await?),
    }
}
