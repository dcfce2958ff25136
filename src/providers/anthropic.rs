//! Anthropic Messages API client.
//!
//! Used for the article draft. The request carries the system role as the
//! top-level `system` string and the full prompt as a single user message;
//! the response's first text block is the completion.

use super::{ProviderError, TextGenerator};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Reqwest-backed client for `POST {base_url}/v1/messages`.
pub struct AnthropicClient {
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl AnthropicClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            timeout: Duration::from_secs(timeout_secs),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl TextGenerator for AnthropicClient {
    async fn complete(
        &self,
        system_role: &str,
        user_prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, ProviderError> {
        let body = MessagesRequest {
            model: self.model.clone(),
            max_tokens,
            temperature,
            system: system_role.to_string(),
            messages: vec![MessageParam {
                role: "user".to_string(),
                content: user_prompt.to_string(),
            }],
        };

        let url = format!("{}/v1/messages", self.base_url.trim_end_matches('/'));
        debug!(model = %self.model, "sending messages request");

        let response = tokio::time::timeout(
            self.timeout,
            self.client
                .post(&url)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(&body)
                .send(),
        )
        .await
        .map_err(|_| ProviderError::Timeout {
            secs: self.timeout.as_secs(),
        })?
        .map_err(|e| ProviderError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api { status, body });
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        let text = first_text(&parsed)
            .ok_or_else(|| ProviderError::Malformed("response has no text block".into()))?;

        Ok(text.trim().to_string())
    }
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    system: String,
    messages: Vec<MessageParam>,
}

#[derive(Debug, Serialize)]
struct MessageParam {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
    /// Any non-text block (tool_use, thinking, ...) is skipped, not fatal.
    #[serde(other)]
    Other,
}

/// First text block of the response, if any.
fn first_text(response: &MessagesResponse) -> Option<&str> {
    response.content.iter().find_map(|block| match block {
        ContentBlock::Text { text } => Some(text.as_str()),
        ContentBlock::Other => None,
    })
}
