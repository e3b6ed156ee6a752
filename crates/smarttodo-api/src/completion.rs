//! Client for an OpenAI-compatible chat completions endpoint.
//!
//! Only the single request shape the suggestion bridge needs is supported: one
//! user message, JSON-object response format, no streaming.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("completion service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("no completion service is configured")]
    NotConfigured,
}

/// Something that turns a prompt into the model's raw text reply.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Returns the message content. An envelope without content yields an
    /// empty string; only transport and HTTP failures are errors.
    async fn complete(&self, prompt: &str) -> Result<String, SuggestError>;
}

pub struct OpenAiCompletions {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiCompletions {
    /// `base_url` includes the version segment, e.g. `https://api.openai.com/v1`.
    pub fn new(base_url: String, api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
            model,
        }
    }

    fn request_body(&self, prompt: &str) -> serde_json::Value {
        json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "response_format": { "type": "json_object" },
        })
    }
}

#[async_trait]
impl CompletionService for OpenAiCompletions {
    async fn complete(&self, prompt: &str) -> Result<String, SuggestError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        let resp = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(SuggestError::Status { status, body });
        }

        let raw = resp.text().await?;
        Ok(message_content(&raw))
    }
}

/// Pull `choices[0].message.content` out of a chat completion envelope.
fn message_content(raw: &str) -> String {
    let envelope: serde_json::Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            warn!("Completion envelope is not JSON: {}", e);
            return String::new();
        }
    };

    match envelope["choices"][0]["message"]["content"].as_str() {
        Some(content) => content.to_owned(),
        None => {
            warn!("Completion envelope has no message content");
            String::new()
        }
    }
}
