//! Generative-language backend.
//!
//! Defines the [`CompletionBackend`] trait the HTTP server talks to, and
//! [`GeminiClient`], the implementation backed by Google's
//! `generateContent` REST endpoint.
//!
//! # Request
//!
//! ```text
//! POST {base_url}/v1beta/models/{model}:generateContent?key={api_key}
//! {"contents": [{"parts": [{"text": "<prompt>"}]}]}
//! ```
//!
//! # Failure handling
//!
//! - Network errors and timeouts → [`UpstreamError::Network`] /
//!   [`UpstreamError::Timeout`]
//! - Non-2xx status → [`UpstreamError::Status`]
//! - 2xx with an unexpected body → empty answer, not an error
//!
//! There are no retries. The key is part of the request URL, so every
//! error message and log line is passed through [`redact`] first.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::config::{ApiKey, UpstreamConfig};
use crate::redact::redact;
use crate::text_util::truncate_chars;

/// Longest raw-body excerpt written to logs or error messages.
pub const BODY_EXCERPT_CHARS: usize = 800;

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("upstream request timed out: {0}")]
    Timeout(String),

    #[error("upstream request failed: {0}")]
    Network(String),

    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to build upstream client: {0}")]
    Client(String),
}

/// Anything that can turn a prompt into answer text.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Short name used in logs (e.g. the model id).
    fn name(&self) -> &str;

    /// Sends `prompt` and returns the answer text.
    async fn complete(&self, prompt: &str) -> Result<String, UpstreamError>;
}

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: ApiKey,
}

impl GeminiClient {
    pub fn new(config: &UpstreamConfig, api_key: ApiKey) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| UpstreamError::Client(redact(&error_chain(&e), api_key.expose())))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url,
            self.model,
            self.api_key.expose()
        )
    }

    /// Sends `prompt` as a single-turn request and returns the answer text.
    pub async fn ask(&self, prompt: &str) -> Result<String, UpstreamError> {
        let key = self.api_key.expose();
        let body = serde_json::json!({
            "contents": [
                { "parts": [ { "text": prompt } ] }
            ]
        });

        let response = self
            .http
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let err = classify_transport_error(&e, key);
                tracing::warn!(model = %self.model, error = %err, "upstream request error");
                err
            })?;

        let status = response.status();
        let raw = response.text().await.map_err(|e| {
            let err = classify_transport_error(&e, key);
            tracing::warn!(model = %self.model, error = %err, "failed to read upstream body");
            err
        })?;
        let excerpt = body_excerpt(&raw, key);

        tracing::info!(model = %self.model, status = status.as_u16(), "upstream responded");
        tracing::info!(body = %excerpt, "upstream raw response (redacted)");

        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body: excerpt,
            });
        }

        Ok(parse_answer(&raw))
    }
}

#[async_trait]
impl CompletionBackend for GeminiClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String, UpstreamError> {
        self.ask(prompt).await
    }
}

/// Extracts `candidates[0].content.parts[0].text` from a response body.
///
/// Any missing step, or a body that is not JSON, yields an empty string.
pub fn parse_answer(raw: &str) -> String {
    serde_json::from_str::<Value>(raw)
        .ok()
        .and_then(|json| {
            json.get("candidates")?
                .get(0)?
                .get("content")?
                .get("parts")?
                .get(0)?
                .get("text")?
                .as_str()
                .map(|s| s.trim().to_string())
        })
        .unwrap_or_default()
}

/// Redacts first, then truncates, so a key straddling the cut can't leak.
fn body_excerpt(raw: &str, key: &str) -> String {
    truncate_chars(&redact(raw, key), BODY_EXCERPT_CHARS).to_string()
}

fn classify_transport_error(err: &reqwest::Error, key: &str) -> UpstreamError {
    let message = redact(&error_chain(err), key);
    if err.is_timeout() {
        UpstreamError::Timeout(message)
    } else {
        UpstreamError::Network(message)
    }
}

/// Renders an error and all of its sources as `outer: inner: ...`.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
