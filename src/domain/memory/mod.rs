//! Conversation memory domain
//!
//! Per-session running summary plus a buffer of verbatim recent turns,
//! injected into every prompt. Sessions live in an explicit [`SessionStore`]
//! owned by the application state.

mod conversation;
mod store;
mod summarizer;

pub use conversation::{ConversationMemory, ConversationTurn, MemoryLimits, TranscriptEntry};
pub use store::{SessionHandle, SessionStore};
pub use summarizer::TurnSummarizer;

#[cfg(test)]
pub use summarizer::mock::MockTurnSummarizer;
