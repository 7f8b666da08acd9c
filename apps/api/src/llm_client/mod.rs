//! LLM Client: the single point of entry for hosted model calls.
//!
//! Callers depend on the `CompletionBackend` trait rather than on `LlmClient`,
//! so handlers and tests can swap in a scripted backend.
//!
//! Retry policy: at most `MAX_ATTEMPTS` attempts. Transport errors, 429 and 5xx
//! are retried after `attempt × retry_delay`; any other failure returns at once.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

pub const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;
pub const MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Text-completion capability consumed by the analysis pipeline.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Returns the model's raw text reply.
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Outcome of a single failed attempt.
enum AttemptError {
    Retryable(LlmError),
    Fatal(LlmError),
}

/// Wraps the Anthropic Messages API with retry logic.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    retry_delay: Duration,
}

impl LlmClient {
    /// `timeout` bounds each attempt; `retry_delay` is the linear back-off unit.
    pub fn new(
        api_key: String,
        model: String,
        timeout: Duration,
        retry_delay: Duration,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint: ANTHROPIC_API_URL.to_string(),
            api_key,
            model,
            retry_delay,
        })
    }

    /// Points the client at another Messages-compatible endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Makes a raw call to the Messages API, returning the full response object.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<LlmResponse, LlmError> {
        let request_body = AnthropicRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut attempt = 1;
        loop {
            match self.send_once(&request_body).await {
                Ok(llm_response) => {
                    debug!(
                        "LLM call succeeded on attempt {}: input_tokens={}, output_tokens={}",
                        attempt, llm_response.usage.input_tokens, llm_response.usage.output_tokens
                    );
                    return Ok(llm_response);
                }
                Err(AttemptError::Retryable(e)) if attempt < MAX_ATTEMPTS => {
                    let delay = retry_delay_for(self.retry_delay, attempt);
                    warn!(
                        "LLM call attempt {attempt} failed ({e}), retrying after {}ms...",
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(AttemptError::Retryable(e)) | Err(AttemptError::Fatal(e)) => return Err(e),
            }
        }
    }

    async fn send_once(
        &self,
        request_body: &AnthropicRequest<'_>,
    ) -> Result<LlmResponse, AttemptError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(request_body)
            .send()
            .await
            .map_err(|e| AttemptError::Retryable(LlmError::Http(e)))?;

        let status = response.status();

        if status.as_u16() == 429 || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            warn!("LLM API returned {}: {}", status, body);
            return Err(AttemptError::Retryable(LlmError::Api {
                status: status.as_u16(),
                message: body,
            }));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(AttemptError::Fatal(LlmError::Api {
                status: status.as_u16(),
                message,
            }));
        }

        response
            .json()
            .await
            .map_err(|e| AttemptError::Fatal(LlmError::Http(e)))
    }
}

#[async_trait]
impl CompletionBackend for LlmClient {
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        let response = self.call(prompt, system).await?;
        response
            .text()
            .filter(|t| !t.trim().is_empty())
            .map(str::to_owned)
            .ok_or(LlmError::EmptyContent)
    }
}

/// Linear back-off: the wait after the n-th failed attempt is `n × unit`.
fn retry_delay_for(unit: Duration, failed_attempts: u32) -> Duration {
    unit * failed_attempts
}
