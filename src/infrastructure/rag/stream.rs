//! Streaming events and their line-oriented wire encoding

use crate::domain::AnswerResult;

pub const STREAM_STARTED_MARKER: &str = "[STREAM_STARTED]";
pub const DONE_MARKER: &str = "[DONE]";
pub const ERROR_PREFIX: &str = "[ERROR]";

/// One item of a streamed answer.
///
/// Order is always `Started`, any number of `Delta`, at most one `Error`,
/// `Completed`, then `Done`.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Started,
    Delta(String),
    Error(String),
    /// Final result after the increments were concatenated and scored
    Completed(Box<AnswerResult>),
    Done,
}

impl StreamEvent {
    /// Wire payload for line-framed transports; `Completed` has none
    pub fn wire_data(&self) -> Option<String> {
        match self {
            Self::Started => Some(STREAM_STARTED_MARKER.to_string()),
            Self::Delta(text) => Some(escape_increment(text)),
            Self::Error(message) => Some(format!("{} {}", ERROR_PREFIX, escape_increment(message))),
            Self::Completed(_) => None,
            Self::Done => Some(DONE_MARKER.to_string()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// Escape an increment so it fits on one line: backslashes are doubled,
/// newlines become the two characters `\n`, carriage returns are dropped.
pub fn escape_increment(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            other => escaped.push(other),
        }
    }
    escaped
}

/// Inverse of [`escape_increment`], for clients
pub fn unescape_increment(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
