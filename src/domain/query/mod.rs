//! Incoming query and its validation

mod validation;

pub use validation::{
    validate_query_text, validate_session_id, QueryValidationError, MAX_QUERY_LENGTH,
    MAX_SESSION_ID_LENGTH,
};

/// A user question, optionally bound to a conversation session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RagQuery {
    pub text: String,
    pub session_id: Option<String>,
}

impl RagQuery {
    /// A stateless query: no memory is read or written
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            session_id: None,
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Validate a memory-bearing query, where the session id is required
    pub fn validated(
        text: &str,
        session_id: Option<&str>,
    ) -> Result<Self, QueryValidationError> {
        validate_query_text(text)?;
        let session_id = validate_session_id(session_id)?;
        Ok(Self::new(text).with_session(session_id))
    }
}
