//! LLM provider implementations

mod factory;
mod http_client;
mod openai;

pub use factory::{LlmProviderConfig, LlmProviderFactory};
pub use http_client::{ByteStream, HttpClient, HttpClientTrait};
pub use openai::{OpenAiProvider, DEFAULT_BASE_URL};

#[cfg(test)]
pub use http_client::mock::MockHttpClient;
