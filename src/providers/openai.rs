//! OpenAI API client: chat completions and image generation.
//!
//! One client serves both contracts — the image-prompt drafts go through
//! `/v1/chat/completions` and the synthesized images through
//! `/v1/images/generations`, sharing the key, base URL, and timeout.

use super::{ImageGenerator, ProviderError, TextGenerator};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Reqwest-backed client for the OpenAI-style endpoints.
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    chat_model: String,
    image_model: String,
    image_size: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        chat_model: impl Into<String>,
        image_model: impl Into<String>,
        image_size: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            chat_model: chat_model.into(),
            image_model: image_model.into(),
            image_size: image_size.into(),
            timeout: Duration::from_secs(timeout_secs),
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn post_json<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, ProviderError> {
        let response = tokio::time::timeout(
            self.timeout,
            self.client
                .post(self.endpoint(path))
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Content-Type", "application/json")
                .json(body)
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
        Ok(response)
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn complete(
        &self,
        system_role: &str,
        user_prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, ProviderError> {
        let body = ChatRequest {
            model: self.chat_model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_role.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt.to_string(),
                },
            ],
            max_tokens: Some(max_tokens),
            temperature: Some(temperature),
        };

        debug!(model = %self.chat_model, "sending chat completion request");
        let response = self.post_json("/v1/chat/completions", &body).await?;

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        let choice = parsed
            .choices
            .first()
            .ok_or_else(|| ProviderError::Malformed("response has no choices".into()))?;

        Ok(choice.message.content.trim().to_string())
    }
}

#[async_trait]
impl ImageGenerator for OpenAiClient {
    async fn synthesize(&self, prompt: &str) -> Result<String, ProviderError> {
        let body = ImageRequest {
            model: self.image_model.clone(),
            prompt: prompt.to_string(),
            n: 1,
            size: self.image_size.clone(),
        };

        debug!(model = %self.image_model, size = %self.image_size, "sending image request");
        let response = self.post_json("/v1/images/generations", &body).await?;

        let parsed: ImageResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        let image = parsed
            .data
            .first()
            .ok_or_else(|| ProviderError::Malformed("response has no image data".into()))?;

        Ok(image.url.clone())
    }
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Serialize)]
struct ImageRequest {
    model: String,
    prompt: String,
    n: u8,
    size: String,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_carries_system_then_user() {
        let body = ChatRequest {
            model: "gpt-3.5-turbo".into(),
            messages: vec![
                ChatMessage {
                    role: "system".into(),
                    content: "role".into(),
                },
                ChatMessage {
                    role: "user".into(),
                    content: "prompt".into(),
                },
            ],
            max_tokens: Some(500),
            temperature: Some(0.7),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["max_tokens"], 500);
    }

    #[test]
    fn image_request_is_single_fixed_size() {
        let body = ImageRequest {
            model: "dall-e-3".into(),
            prompt: "a lighthouse at dawn".into(),
            n: 1,
            size: "1024x1024".into(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["n"], 1);
        assert_eq!(json["size"], "1024x1024");
    }

    #[test]
    fn image_response_first_url_parses() {
        let json = r#"{"data":[{"url":"https://img.example/one.png"}]}"#;
        let parsed: ImageResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.data[0].url, "https://img.example/one.png");
    }

    #[test]
    fn endpoint_join_handles_trailing_slash() {
        let c = OpenAiClient::new("https://api.openai.com/", "k", "m", "i", "1024x1024", 10);
        assert_eq!(
            c.endpoint("/v1/chat/completions"),
            "https://api.openai.com/v1/chat/completions"
        );
    }
}
