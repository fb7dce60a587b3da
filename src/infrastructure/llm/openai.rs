use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::http_client::{ByteStream, HttpClientTrait};
use crate::domain::{
    DomainError, FinishReason, LlmProvider, LlmRequest, LlmResponse, LlmStream, Message,
    StreamChunk, Usage,
};

/// Gemini's OpenAI-compatible endpoint; any `/chat/completions` server works
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Chat provider speaking the OpenAI chat completions protocol
#[derive(Debug)]
pub struct OpenAiProvider<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    has_key: bool,
    base_url: String,
}

impl<C: HttpClientTrait> OpenAiProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_BASE_URL)
    }

    /// `base_url` includes the version segment, e.g. `https://api.openai.com/v1`
    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let api_key = api_key.into();
        let auth_header = format!("Bearer {}", api_key);
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            auth_header,
            has_key: !api_key.trim().is_empty(),
            base_url,
        }
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_request(&self, model: &str, request: &LlmRequest) -> serde_json::Value {
        let messages: Vec<OpenAiMessage> =
            request.messages.iter().map(OpenAiMessage::from_domain).collect();

        let mut body = serde_json::json!({
            "model": model,
            "messages": messages,
            "stream": request.stream,
        });

        if let Some(temp) = request.temperature {
            body["temperature"] = serde_json::json!(temp);
        }

        body
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn ensure_credential(&self) -> Result<(), DomainError> {
        if self.has_key {
            Ok(())
        } else {
            Err(DomainError::configuration("No API key configured for the language model"))
        }
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<LlmResponse, DomainError> {
        let response: OpenAiResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("openai", format!("Failed to parse response: {}", e))
        })?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::provider("openai", "No choices in response"))?;

        let message = Message::assistant(choice.message.content.unwrap_or_default());

        let mut llm_response = LlmResponse::new(
            response.id.unwrap_or_default(),
            response.model.unwrap_or_default(),
            message,
        );

        if let Some(reason) = choice.finish_reason {
            llm_response = llm_response.with_finish_reason(FinishReason::parse(&reason));
        }

        if let Some(usage) = response.usage {
            llm_response =
                llm_response.with_usage(Usage::new(usage.prompt_tokens, usage.completion_tokens));
        }

        Ok(llm_response)
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for OpenAiProvider<C> {
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError> {
        self.ensure_credential()?;

        let mut req = request;
        req.stream = false;

        let url = self.chat_completions_url();
        let body = self.build_request(model, &req);
        let response = self.client.post_json(&url, self.headers(), &body).await?;

        self.parse_response(response)
    }

    async fn chat_stream(
        &self,
        model: &str,
        request: LlmRequest,
    ) -> Result<LlmStream, DomainError> {
        self.ensure_credential()?;

        let mut req = request;
        req.stream = true;

        let url = self.chat_completions_url();
        let body = self.build_request(model, &req);
        let byte_stream = self
            .client
            .post_json_stream(&url, self.headers(), &body)
            .await?;

        Ok(sse_chunk_stream(byte_stream, model.to_string()))
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn has_credential(&self) -> bool {
        self.has_key
    }
}

/// Line-buffered SSE decoder.
///
/// Network frames do not align with SSE lines, and a frame may end inside a
/// multi-byte character, so bytes are buffered until a full line is available.
struct SseDecoder {
    bytes: ByteStream,
    buffer: Vec<u8>,
    pending: VecDeque<Result<StreamChunk, DomainError>>,
    model: String,
    finished: bool,
}

impl SseDecoder {
    fn drain_lines(&mut self) {
        while !self.finished {
            let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') else {
                break;
            };
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            self.handle_line(line.trim_end());
        }
    }

    fn handle_line(&mut self, line: &str) {
        let Some(data) = line.strip_prefix("data:") else {
            return;
        };
        let data = data.trim();

        if data == "[DONE]" {
            self.finished = true;
            return;
        }

        match serde_json::from_str::<OpenAiStreamChunk>(data) {
            Ok(chunk) => {
                if let Some(choice) = chunk.choices.into_iter().next() {
                    let mut stream_chunk = StreamChunk::new(
                        chunk.id.unwrap_or_default(),
                        chunk.model.unwrap_or_else(|| self.model.clone()),
                    );

                    if let Some(delta) = choice.delta.content {
                        stream_chunk = stream_chunk.with_delta(delta);
                    }

                    if let Some(reason) = choice.finish_reason {
                        stream_chunk = stream_chunk.with_finish_reason(FinishReason::parse(&reason));
                    }

                    self.pending.push_back(Ok(stream_chunk));
                }
            }
            Err(e) => match serde_json::from_str::<OpenAiStreamError>(data) {
                Ok(event) => {
                    let message = event
                        .error
                        .message
                        .unwrap_or_else(|| "stream error event".to_string());
                    tracing::warn!(error = %message, "Provider reported an error mid-stream");
                    self.pending
                        .push_back(Err(DomainError::provider("openai", message)));
                    self.finished = true;
                }
                Err(_) => tracing::debug!(error = %e, "Skipping unparseable stream event"),
            },
        }
    }
}

fn sse_chunk_stream(bytes: ByteStream, model: String) -> LlmStream {
    let decoder = SseDecoder {
        bytes,
        buffer: Vec::new(),
        pending: VecDeque::new(),
        model,
        finished: false,
    };

    let stream = futures::stream::unfold(decoder, |mut decoder| async move {
        loop {
            if let Some(item) = decoder.pending.pop_front() {
                return Some((item, decoder));
            }

            if decoder.finished {
                return None;
            }

            match decoder.bytes.next().await {
                Some(Ok(bytes)) => {
                    decoder.buffer.extend_from_slice(&bytes);
                    decoder.drain_lines();
                }
                Some(Err(e)) => {
                    decoder.finished = true;
                    return Some((Err(e), decoder));
                }
                None => {
                    // Flush a final line without a trailing newline
                    decoder.buffer.push(b'\n');
                    decoder.drain_lines();
                    decoder.finished = true;
                }
            }
        }
    });

    Box::pin(stream)
}

// OpenAI API types

#[derive(Debug, Serialize)]
struct OpenAiMessage {
    role: &'static str,
    content: String,
}

impl OpenAiMessage {
    fn from_domain(message: &Message) -> Self {
        Self {
            role: message.role.as_str(),
            content: message.content_text().to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    id: Option<String>,
    model: Option<String>,
    choices: Vec<OpenAiChoice>,
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiStreamChunk {
    id: Option<String>,
    model: Option<String>,
    choices: Vec<OpenAiStreamChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiStreamChoice {
    delta: OpenAiDelta,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiDelta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiStreamError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: Option<String>,
}
