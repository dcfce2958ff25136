//! Provider seam: trait abstractions over the external generation services.
//!
//! The pipeline only ever sees [`TextGenerator`] and [`ImageGenerator`];
//! concrete HTTP clients live in [`anthropic`] and [`openai`], and
//! deterministic stand-ins in [`mock`]. Keeping the seam here means the
//! orchestrator, the session, and every test share one vocabulary for
//! "a thing that completes text" and "a thing that returns an image URL".

pub mod anthropic;
pub mod mock;
pub mod openai;

pub use anthropic::AnthropicClient;
pub use mock::{MockImageGenerator, MockTextGenerator};
pub use openai::OpenAiClient;

use async_trait::async_trait;
use thiserror::Error;

/// Failure of a single provider call. One attempt per call — the pipeline
/// never retries, so there is no transient/permanent distinction here.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The HTTP request could not be sent or the connection dropped.
    #[error("request failed: {0}")]
    Request(String),

    /// The provider answered with a non-success status.
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// The call exceeded the configured timeout.
    #[error("call timed out after {secs}s")]
    Timeout { secs: u64 },

    /// The response body did not have the expected shape.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Chat-style text completion.
///
/// Both prompt templates (article drafting, image-prompt drafting) go through
/// this one contract; they differ only in content, not in invocation shape.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send a system role and user prompt, return the completion text
    /// trimmed of surrounding whitespace.
    async fn complete(
        &self,
        system_role: &str,
        user_prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, ProviderError>;
}

/// Image synthesis from a text prompt.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate one image and return the provider-hosted URL.
    ///
    /// The URL is returned as-is; the image bytes are never fetched or
    /// validated by this crate.
    async fn synthesize(&self, prompt: &str) -> Result<String, ProviderError>;
}
