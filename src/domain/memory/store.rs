//! Process-wide session registry

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::{ConversationMemory, MemoryLimits, TurnSummarizer};

/// Exclusive access to one session's memory.
///
/// Callers hold the lock from reading history until the finished turn is
/// appended, so requests on the same session are serialized while different
/// sessions proceed in parallel.
pub type SessionHandle = Arc<Mutex<ConversationMemory>>;

/// Maps session ids to their conversation memory.
///
/// Sessions are created lazily and live until reset or shutdown; there is no
/// eviction, so memory grows with the number of distinct sessions.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionHandle>>,
    limits: MemoryLimits,
    summarizer: Option<Arc<dyn TurnSummarizer>>,
    closed: AtomicBool,
}

impl SessionStore {
    pub fn new(limits: MemoryLimits) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            limits,
            summarizer: None,
            closed: AtomicBool::new(false),
        }
    }

    pub fn with_summarizer(mut self, summarizer: Arc<dyn TurnSummarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    fn new_memory(&self) -> ConversationMemory {
        let memory = ConversationMemory::new(self.limits);
        match self.summarizer {
            Some(ref summarizer) => memory.with_summarizer(summarizer.clone()),
            None => memory,
        }
    }

    /// Handle to the session's memory, creating it on first access.
    ///
    /// After shutdown the returned memory is detached: callers still work but
    /// nothing is registered.
    pub async fn get_or_create(&self, session_id: &str) -> SessionHandle {
        if let Some(handle) = self.sessions.read().await.get(session_id) {
            return handle.clone();
        }

        let mut sessions = self.sessions.write().await;
        if self.is_closed() {
            warn!(session_id = %session_id, "Session store is shut down, using detached memory");
            return Arc::new(Mutex::new(self.new_memory()));
        }

        sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                debug!(session_id = %session_id, "Creating session memory");
                Arc::new(Mutex::new(self.new_memory()))
            })
            .clone()
    }

    /// Existing handle without creating one
    pub async fn get(&self, session_id: &str) -> Option<SessionHandle> {
        self.sessions.read().await.get(session_id).cloned()
    }

    /// Drop a session's memory; returns whether it existed
    pub async fn reset(&self, session_id: &str) -> bool {
        let removed = self.sessions.write().await.remove(session_id).is_some();
        if removed {
            info!(session_id = %session_id, "Session memory reset");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Release every session; called once when the process stops
    pub async fn shutdown(&self) {
        self.closed.store(true, Ordering::SeqCst);
        let mut sessions = self.sessions.write().await;
        info!(sessions = sessions.len(), "Session store shutting down");
        sessions.clear();
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(MemoryLimits::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let store = SessionStore::default();

        let first = store.get_or_create("s1").await;
        let second = store.get_or_create("s1").await;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::default();

        store
            .get_or_create("a")
            .await
            .lock()
            .await
            .add_turn("hello", "hi there")
            .await;

        let other = store.get_or_create("b").await;
        assert_eq!(other.lock().await.build_context(), "");

        let same = store.get_or_create("a").await;
        assert!(same.lock().await.build_context().contains("hi there"));
    }

    #[tokio::test]
    async fn test_reset() {
        let store = SessionStore::default();
        store
            .get_or_create("s")
            .await
            .lock()
            .await
            .add_turn("q", "a")
            .await;

        assert!(store.reset("s").await);
        assert!(!store.reset("s").await);
        assert!(store.get("s").await.is_none());
        assert!(store.get_or_create("s").await.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_clears_sessions() {
        let store = SessionStore::default();
        store.get_or_create("a").await;
        store.get_or_create("b").await;

        store.shutdown().await;

        assert!(store.is_closed());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_sessions_after_shutdown_are_detached() {
        let store = SessionStore::default();
        store.shutdown().await;

        let handle = store.get_or_create("late").await;
        handle.lock().await.add_turn("q", "a").await;

        assert!(store.get("late").await.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_same_session_requests_are_serialized() {
        let store = Arc::new(SessionStore::default());
        let mut tasks = Vec::new();

        for i in 0..8 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                let handle = store.get_or_create("shared").await;
                let mut memory = handle.lock().await;
                let before = memory.turn_count();
                tokio::task::yield_now().await;
                memory.add_turn(format!("q{i}"), format!("a{i}")).await;
                assert_eq!(memory.turn_count(), before + 1);
            }));
        }

        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(store.get_or_create("shared").await.lock().await.turn_count(), 8);
    }
}
