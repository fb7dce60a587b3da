//! Query validation

use thiserror::Error;

use crate::domain::DomainError;

/// Errors that can occur when validating a query request
#[derive(Debug, Error, Clone, PartialEq)]
pub enum QueryValidationError {
    #[error("Query cannot be empty")]
    EmptyQuery,

    #[error("Query cannot exceed {0} characters")]
    QueryTooLong(usize),

    #[error("session_id is required")]
    MissingSessionId,

    #[error("session_id cannot exceed {0} characters")]
    SessionIdTooLong(usize),

    #[error("session_id cannot contain control characters")]
    InvalidSessionId,
}

pub const MAX_QUERY_LENGTH: usize = 4000;
pub const MAX_SESSION_ID_LENGTH: usize = 128;

impl From<QueryValidationError> for DomainError {
    fn from(error: QueryValidationError) -> Self {
        DomainError::validation(error.to_string())
    }
}

/// Validate query text; it must be non-empty after trimming
pub fn validate_query_text(text: &str) -> Result<(), QueryValidationError> {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return Err(QueryValidationError::EmptyQuery);
    }

    if trimmed.chars().count() > MAX_QUERY_LENGTH {
        return Err(QueryValidationError::QueryTooLong(MAX_QUERY_LENGTH));
    }

    Ok(())
}

/// Validate a required session id and return it trimmed
pub fn validate_session_id(session_id: Option<&str>) -> Result<&str, QueryValidationError> {
    let id = session_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(QueryValidationError::MissingSessionId)?;

    if id.len() > MAX_SESSION_ID_LENGTH {
        return Err(QueryValidationError::SessionIdTooLong(MAX_SESSION_ID_LENGTH));
    }

    if id.chars().any(char::is_control) {
        return Err(QueryValidationError::InvalidSessionId);
    }

    Ok(id)
}
