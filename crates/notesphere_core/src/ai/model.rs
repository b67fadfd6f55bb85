//! Model transport.
//!
//! # Responsibility
//! - Define the seam between the suggestion client and a hosted model.
//! - Provide an OpenAI-compatible chat-completions implementation.
//!
//! # Invariants
//! - The API key is read once at construction and never logged.
//! - Non-2xx statuses are mapped to typed errors, bodies kept for logs only.

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use serde_json::{json, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

/// Default chat-completions endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

pub type AiResult<T> = Result<T, AiError>;

/// Transport or model failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiError {
    /// No API key in the configured environment variable.
    MissingApiKey(String),
    /// Client could not be built or the request never completed.
    Network(String),
    AuthenticationFailed(String),
    RateLimited(String),
    InvalidRequest(String),
    ServerError { status: u16, message: String },
    UnexpectedStatus { status: u16, message: String },
    /// Response body did not contain a JSON object.
    Parse(String),
}

impl Display for AiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingApiKey(var) => write!(f, "API key not configured (set `{var}`)"),
            Self::Network(message) => write!(f, "network error: {message}"),
            Self::AuthenticationFailed(message) => write!(f, "authentication failed: {message}"),
            Self::RateLimited(message) => write!(f, "rate limited: {message}"),
            Self::InvalidRequest(message) => write!(f, "invalid request: {message}"),
            Self::ServerError { status, message } => {
                write!(f, "model server error {status}: {message}")
            }
            Self::UnexpectedStatus { status, message } => write!(f, "HTTP {status}: {message}"),
            Self::Parse(message) => write!(f, "unparseable model response: {message}"),
        }
    }
}

impl Error for AiError {}

/// Maps an HTTP error status to a typed error.
pub fn parse_http_error(status: u16, body: &str) -> AiError {
    let message = body.to_string();
    match status {
        401 | 403 => AiError::AuthenticationFailed(message),
        429 => AiError::RateLimited(message),
        400 | 404 | 422 => AiError::InvalidRequest(message),
        500..=599 => AiError::ServerError { status, message },
        _ => AiError::UnexpectedStatus { status, message },
    }
}

/// Hosted model producing structured suggestion output.
#[async_trait]
pub trait SuggestionModel: Send + Sync {
    /// Sends the fully rendered prompt; returns the model's JSON output.
    async fn generate(&self, prompt: &str) -> AiResult<Value>;
}

/// Connection settings for [`HttpSuggestionModel`].
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    /// Full chat-completions URL.
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    /// Env var the key came from, for error messages.
    pub api_key_env: String,
    pub temperature: f32,
    pub timeout: Duration,
}

/// OpenAI-compatible chat-completions model.
pub struct HttpSuggestionModel {
    settings: ModelSettings,
    client: reqwest::Client,
}

impl HttpSuggestionModel {
    pub fn new(settings: ModelSettings) -> AiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|err| AiError::Network(err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn build_request_body(&self, prompt: &str) -> Value {
        json!({
            "model": self.settings.model,
            "temperature": self.settings.temperature,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "user", "content": prompt }
            ],
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[async_trait]
impl SuggestionModel for HttpSuggestionModel {
    async fn generate(&self, prompt: &str) -> AiResult<Value> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or_else(|| AiError::MissingApiKey(self.settings.api_key_env.clone()))?;
        let started_at = Instant::now();

        let response = self
            .client
            .post(&self.settings.base_url)
            .bearer_auth(api_key)
            .json(&self.build_request_body(prompt))
            .send()
            .await
            .map_err(|err| AiError::Network(err.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| AiError::Network(err.to_string()))?;
        debug!(
            "event=ai_http module=ai status_code={status} duration_ms={} body_bytes={}",
            started_at.elapsed().as_millis(),
            body.len()
        );

        if !(200..300).contains(&status) {
            return Err(parse_http_error(status, &body));
        }

        let completion: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|err| AiError::Parse(format!("completion envelope: {err}")))?;
        let content = completion
            .choices
            .into_iter()
            .find_map(|choice| choice.message.content)
            .ok_or_else(|| AiError::Parse("completion has no message content".to_string()))?;
        serde_json::from_str(strip_code_fence(&content))
            .map_err(|err| AiError::Parse(format!("message content: {err}")))
    }
}

/// Removes a surrounding ```json fence some models add despite JSON mode.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    let inner = inner.trim_start_matches(|ch: char| ch.is_ascii_alphabetic());
    inner.trim()
}
