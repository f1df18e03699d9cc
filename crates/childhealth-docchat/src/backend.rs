//! Answer generation backends.
//!
//! Backends:
//!   GeminiBackend       : Google Gemini `generateContent` (gemini-1.5-pro, flash, …)
//!   StaticAnswerBackend : canned replies for tests and offline runs

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
    #[error("API error [{status}]: {message}")]
    ApiError { status: u16, message: String },
    #[error("Model returned no text")]
    EmptyResponse,
}

// ── Trait ─────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait AnswerBackend: Send + Sync {
    /// Answer `question` under `system_prompt`, which already carries the
    /// retrieved context.
    async fn answer(&self, system_prompt: &str, question: &str) -> Result<String, LlmError>;

    fn model_id(&self) -> &str;
}

async fn check_response_status(resp: reqwest::Response) -> Result<Value, LlmError> {
    let status = resp.status().as_u16();
    let body: Value = resp.json().await?;
    if status >= 400 {
        let msg = body["error"]["message"]
            .as_str()
            .or_else(|| body["message"].as_str())
            .unwrap_or("unknown API error")
            .to_string();
        return Err(LlmError::ApiError { status, message: msg });
    }
    Ok(body)
}

// ── Google Gemini ─────────────────────────────────────────────────────────────

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiBackend {
    pub model: String,
    pub temperature: f32,
    base_url: String,
    api_key: SecretString,
    client: reqwest::Client,
}

impl GeminiBackend {
    pub fn new(
        api_key: SecretString,
        model: impl Into<String>,
        temperature: f32,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            model: model.into(),
            temperature,
            base_url: GEMINI_API_BASE.to_string(),
            api_key,
            client,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn request_body(&self, system_prompt: &str, question: &str) -> Value {
        json!({
            "systemInstruction": { "parts": [{ "text": system_prompt }] },
            "contents": [{ "role": "user", "parts": [{ "text": question }] }],
            "generationConfig": { "temperature": self.temperature }
        })
    }
}

/// Concatenated text parts of the first candidate.
fn candidate_text(json: &Value) -> Option<String> {
    let parts = json["candidates"][0]["content"]["parts"].as_array()?;
    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    (!text.trim().is_empty()).then_some(text)
}

#[async_trait]
impl AnswerBackend for GeminiBackend {
    async fn answer(&self, system_prompt: &str, question: &str) -> Result<String, LlmError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let resp = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.expose_secret())])
            .json(&self.request_body(system_prompt, question))
            .send()
            .await?;
        let json = check_response_status(resp).await?;

        debug!(
            model = %self.model,
            prompt_tokens = json["usageMetadata"]["promptTokenCount"].as_u64().unwrap_or(0),
            completion_tokens = json["usageMetadata"]["candidatesTokenCount"].as_u64().unwrap_or(0),
            "gemini answer"
        );
        candidate_text(&json).ok_or(LlmError::EmptyResponse)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

// ── Static (tests, offline) ───────────────────────────────────────────────────

pub struct StaticAnswerBackend {
    reply: Result<String, String>,
}

impl StaticAnswerBackend {
    pub fn new(reply: impl Into<String>) -> Self {
        Self { reply: Ok(reply.into()) }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self { reply: Err(message.into()) }
    }
}

#[async_trait]
impl AnswerBackend for StaticAnswerBackend {
    async fn answer(&self, _system_prompt: &str, _question: &str) -> Result<String, LlmError> {
        self.reply.clone().map_err(LlmError::Unavailable)
    }

    fn model_id(&self) -> &str {
        "static"
    }
}
