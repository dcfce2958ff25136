//! Session context: credentials and the provider clients built from them.
//!
//! The session is the explicit replacement for ambient per-run state: every
//! pipeline call receives `&Session`, and the clients it holds are
//! constructed exactly once, when the credentials are submitted.
//!
//! # Credential replacement is atomic
//!
//! A `Session` is immutable. Changing either key means building a new
//! `Session` from the new [`Credentials`]; the old clients become
//! unreachable the moment the caller swaps the value, so a stale key can
//! never be used for a call issued after the change. There is no teardown —
//! the session holds nothing beyond client handles.

use crate::config::GenerationConfig;
use crate::error::ArticleGenError;
use crate::pipeline::extract::{HttpExtractor, SourceExtractor};
use crate::providers::{AnthropicClient, ImageGenerator, OpenAiClient, TextGenerator};
use std::sync::Arc;

/// The two secret API keys supplied by the operator.
///
/// Held only for the lifetime of the session; never written to disk.
#[derive(Clone)]
pub struct Credentials {
    /// Key for the text-generation provider (article drafting).
    pub text_key: String,
    /// Key for the prompt-drafting and image-synthesis provider.
    pub image_key: String,
}

impl Credentials {
    pub fn new(text_key: impl Into<String>, image_key: impl Into<String>) -> Self {
        Self {
            text_key: text_key.into(),
            image_key: image_key.into(),
        }
    }

    /// Both keys must be present before any downstream stage may run.
    pub fn validate(&self) -> Result<(), ArticleGenError> {
        if self.text_key.trim().is_empty() {
            return Err(ArticleGenError::MissingCredential { which: "text" });
        }
        if self.image_key.trim().is_empty() {
            return Err(ArticleGenError::MissingCredential { which: "image" });
        }
        Ok(())
    }
}

// Keys are secrets; keep them out of debug output.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("text_key", &"<redacted>")
            .field("image_key", &"<redacted>")
            .finish()
    }
}

/// Immutable bundle of the clients one run needs.
#[derive(Clone)]
pub struct Session {
    article_generator: Arc<dyn TextGenerator>,
    prompt_generator: Arc<dyn TextGenerator>,
    image_generator: Arc<dyn ImageGenerator>,
    extractor: Arc<dyn SourceExtractor>,
}

// The clients are opaque trait objects; show only the struct name.
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

impl Session {
    /// Build a session with real clients from the given credentials.
    ///
    /// The article draft goes to the Anthropic messages endpoint; prompt
    /// drafting and image synthesis share one OpenAI client.
    pub fn new(
        credentials: &Credentials,
        config: &GenerationConfig,
    ) -> Result<Self, ArticleGenError> {
        credentials.validate()?;

        let article = AnthropicClient::new(
            &config.anthropic_base_url,
            &credentials.text_key,
            &config.article_model,
            config.api_timeout_secs,
        );
        let openai = Arc::new(OpenAiClient::new(
            &config.openai_base_url,
            &credentials.image_key,
            &config.prompt_model,
            &config.image_model,
            &config.image_size,
            config.api_timeout_secs,
        ));

        Ok(Self {
            article_generator: Arc::new(article),
            prompt_generator: Arc::clone(&openai) as Arc<dyn TextGenerator>,
            image_generator: openai as Arc<dyn ImageGenerator>,
            extractor: Arc::new(HttpExtractor::new(config.fetch_timeout_secs)?),
        })
    }

    /// Build a session from caller-supplied components.
    ///
    /// Used in tests and by embedders that need custom middleware around a
    /// provider; no credential check happens here since the caller already
    /// constructed working clients.
    pub fn with_providers(
        article_generator: Arc<dyn TextGenerator>,
        prompt_generator: Arc<dyn TextGenerator>,
        image_generator: Arc<dyn ImageGenerator>,
        extractor: Arc<dyn SourceExtractor>,
    ) -> Self {
        Self {
            article_generator,
            prompt_generator,
            image_generator,
            extractor,
        }
    }

    pub fn article_generator(&self) -> &Arc<dyn TextGenerator> {
        &self.article_generator
    }

    pub fn prompt_generator(&self) -> &Arc<dyn TextGenerator> {
        &self.prompt_generator
    }

    pub fn image_generator(&self) -> &Arc<dyn ImageGenerator> {
        &self.image_generator
    }

    pub fn extractor(&self) -> &Arc<dyn SourceExtractor> {
        &self.extractor
    }
}
