//! Configuration types for article generation.
//!
//! All generation behaviour is controlled through [`GenerationConfig`], built
//! via its [`GenerationConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share configs across calls, serialise them for logging, and
//! diff two runs to understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! A dozen-field constructor is unreadable and breaks on every new field.
//! The builder pattern lets callers set only what they care about and rely on
//! well-documented defaults for the rest.

use crate::error::ArticleGenError;
use serde::{Deserialize, Serialize};

/// Number of source URLs per run, image prompts per run, and images per run.
/// The article template reserves exactly this many placeholders.
pub const IMAGE_SLOTS: usize = 3;

/// Configuration for one article-generation run.
///
/// Built via [`GenerationConfig::builder()`] or using
/// [`GenerationConfig::default()`].
///
/// # Example
/// ```rust
/// use url2article::GenerationConfig;
///
/// let config = GenerationConfig::builder()
///     .article_model("claude-sonnet-4-20250514")
///     .temperature(0.9)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Model used for the article draft. Default: "claude-3-5-sonnet-20240620".
    pub article_model: String,

    /// Model used for image-prompt drafting. Default: "gpt-3.5-turbo".
    ///
    /// Prompt drafting is a short, low-stakes completion; a small, cheap chat
    /// model is the right default. Raise this only if the prompts come out
    /// too generic for your image model.
    pub prompt_model: String,

    /// Image-synthesis model. Default: "dall-e-3".
    pub image_model: String,

    /// Fixed resolution for every synthesized image. Default: "1024x1024".
    ///
    /// One square size keeps the request shape constant; the article layout
    /// does not depend on image dimensions.
    pub image_size: String,

    /// Maximum tokens for the article draft. Default: 4096.
    ///
    /// The template asks for an 800–1000 word article; 4096 tokens covers
    /// that with headroom. Setting this too low silently truncates the
    /// article mid-sentence.
    pub article_max_tokens: u32,

    /// Maximum tokens for each image-prompt draft. Default: 500.
    ///
    /// Prompts are asked to be 50–100 words; 500 tokens is generous without
    /// letting a rambling completion run up cost.
    pub prompt_max_tokens: u32,

    /// Sampling temperature for both text calls. Default: 0.7.
    ///
    /// Article writing wants some creativity; 0.7 is the conventional
    /// middle ground. Lower it if drafts drift off-keyword.
    pub temperature: f32,

    /// How many characters of the drafted article each image-prompt call
    /// sees as context. Default: 500.
    ///
    /// The prompt calls only need the article's opening to stay on-topic;
    /// sending the whole draft would triple input cost for no gain.
    pub article_prefix_chars: usize,

    /// Timeout for each source-URL fetch in seconds. Default: 30.
    pub fetch_timeout_secs: u64,

    /// Timeout for each provider API call in seconds. Default: 120.
    ///
    /// A 1000-word draft can take over a minute on a large model; image
    /// synthesis is similar. 120 s trips only on genuinely stuck calls.
    pub api_timeout_secs: u64,

    /// Base URL for the Anthropic-style messages endpoint.
    /// Default: "https://api.anthropic.com". Override for proxies or tests.
    pub anthropic_base_url: String,

    /// Base URL for the OpenAI-style endpoints.
    /// Default: "https://api.openai.com". Override for compatible gateways.
    pub openai_base_url: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            article_model: "claude-3-5-sonnet-20240620".to_string(),
            prompt_model: "gpt-3.5-turbo".to_string(),
            image_model: "dall-e-3".to_string(),
            image_size: "1024x1024".to_string(),
            article_max_tokens: 4096,
            prompt_max_tokens: 500,
            temperature: 0.7,
            article_prefix_chars: 500,
            fetch_timeout_secs: 30,
            api_timeout_secs: 120,
            anthropic_base_url: "https://api.anthropic.com".to_string(),
            openai_base_url: "https://api.openai.com".to_string(),
        }
    }
}

impl GenerationConfig {
    /// Create a new builder for `GenerationConfig`.
    pub fn builder() -> GenerationConfigBuilder {
        GenerationConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`GenerationConfig`].
#[derive(Debug)]
pub struct GenerationConfigBuilder {
    config: GenerationConfig,
}

impl GenerationConfigBuilder {
    pub fn article_model(mut self, model: impl Into<String>) -> Self {
        self.config.article_model = model.into();
        self
    }

    pub fn prompt_model(mut self, model: impl Into<String>) -> Self {
        self.config.prompt_model = model.into();
        self
    }

    pub fn image_model(mut self, model: impl Into<String>) -> Self {
        self.config.image_model = model.into();
        self
    }

    pub fn image_size(mut self, size: impl Into<String>) -> Self {
        self.config.image_size = size.into();
        self
    }

    pub fn article_max_tokens(mut self, n: u32) -> Self {
        self.config.article_max_tokens = n.max(1);
        self
    }

    pub fn prompt_max_tokens(mut self, n: u32) -> Self {
        self.config.prompt_max_tokens = n.max(1);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn article_prefix_chars(mut self, n: usize) -> Self {
        self.config.article_prefix_chars = n;
        self
    }

    pub fn fetch_timeout_secs(mut self, secs: u64) -> Self {
        self.config.fetch_timeout_secs = secs;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn anthropic_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.anthropic_base_url = url.into();
        self
    }

    pub fn openai_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.openai_base_url = url.into();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<GenerationConfig, ArticleGenError> {
        let c = &self.config;
        if c.article_model.is_empty() || c.prompt_model.is_empty() || c.image_model.is_empty() {
            return Err(ArticleGenError::InvalidConfig(
                "Model identifiers must be non-empty".into(),
            ));
        }
        if c.article_prefix_chars == 0 {
            return Err(ArticleGenError::InvalidConfig(
                "article_prefix_chars must be ≥ 1".into(),
            ));
        }
        if !c.image_size.contains('x') {
            return Err(ArticleGenError::InvalidConfig(format!(
                "image_size must look like WIDTHxHEIGHT, got '{}'",
                c.image_size
            )));
        }
        Ok(self.config)
    }
}
