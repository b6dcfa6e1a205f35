//! OpenAI-compatible embedding and completion client.
//!
//! Blocking HTTP client for the two external collaborators. Configuration
//! is explicit — the API key is read from the environment once at startup
//! and carried in [`OpenAiConfig`], never held in global state.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::{ChatModel, Embedder};

/// Environment variable holding the API credential.
const API_KEY_VAR: &str = "OPENAI_API_KEY";

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for [`OpenAiClient`].
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API credential
    pub api_key: String,

    /// Base URL of the API (override for compatible providers)
    pub base_url: String,

    /// Embedding model identifier
    pub embedding_model: String,

    /// Completion model identifier
    pub chat_model: String,

    /// Timeout applied to every request; external calls have no bounded
    /// latency guarantee of their own
    pub timeout: Duration,
}

impl OpenAiConfig {
    /// Create a configuration with the given API key and default models.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Read the API key from `OPENAI_API_KEY`.
    ///
    /// Call once at process start: a missing credential is a configuration
    /// error, not a per-request one.
    pub fn from_env() -> Result<Self> {
        Self::from_env_var(API_KEY_VAR)
    }

    fn from_env_var(var: &'static str) -> Result<Self> {
        match std::env::var(var) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key)),
            _ => Err(Error::MissingApiKey(var)),
        }
    }

    /// Override the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the embedding model.
    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    /// Override the completion model.
    pub fn with_chat_model(mut self, model: impl Into<String>) -> Self {
        self.chat_model = model.into();
        self
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Client for an OpenAI-compatible API, implementing both collaborator
/// seams: [`Embedder`] and [`ChatModel`].
pub struct OpenAiClient {
    http: reqwest::blocking::Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    /// Create a client from configuration.
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::EmbeddingService(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    /// Create a client with the key from the environment and defaults
    /// everywhere else.
    pub fn from_env() -> Result<Self> {
        Self::new(OpenAiConfig::from_env()?)
    }

    /// The active configuration.
    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }
}

impl Embedder for OpenAiClient {
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let request = EmbeddingRequest {
            model: &self.config.embedding_model,
            input: texts,
        };

        let response = self
            .http
            .post(format!("{}/embeddings", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .map_err(|e| Error::EmbeddingService(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(Error::EmbeddingService(format!("API error {status}: {body}")));
        }

        let api_response: EmbeddingResponse = response
            .json()
            .map_err(|e| Error::EmbeddingService(format!("malformed response: {e}")))?;

        // Order by the service-reported index; response order is not
        // guaranteed to match submission order.
        let mut data = api_response.data;
        data.sort_by_key(|d| d.index);

        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}

impl ChatModel for OpenAiClient {
    fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.config.chat_model,
            messages: vec![ChatRequestMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .map_err(|e| Error::QueryService(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(Error::QueryService(format!("API error {status}: {body}")));
        }

        let api_response: ChatResponse = response
            .json()
            .map_err(|e| Error::QueryService(format!("malformed response: {e}")))?;

        api_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::QueryService("no choices in response".to_string()))
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatRequestMessage<'a>>,
}

#[derive(Serialize)]
struct ChatRequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}
