//! Routed retrieval-augmented answering

mod generator;
mod pipeline;
mod prompt;
mod stream;

pub use generator::{Generator, TextStream};
pub use pipeline::{PipelineSettings, RagPipeline, SessionTranscript};
pub use prompt::PromptBuilder;
pub use stream::{
    escape_increment, unescape_increment, StreamEvent, DONE_MARKER, ERROR_PREFIX,
    STREAM_STARTED_MARKER,
};
