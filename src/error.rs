//! Error types for the url2article library.
//!
//! A run either produces a complete [`crate::output::ArticleOutput`] or fails
//! at the first broken stage — there is no partial output and nothing is
//! retried. Every variant therefore maps to exactly one pipeline [`Stage`],
//! and [`ArticleGenError::stage`] lets callers report "failed at <stage>"
//! without matching on the variant themselves.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The five sequential phases of a generation run.
///
/// Each stage is gated on the success of the previous one; the orchestrator
/// in [`crate::generate`] never enters a stage after a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Stage {
    /// Fetch the three source URLs and extract paragraph text.
    Extract,
    /// Draft the article from the combined source text.
    Draft,
    /// Draft the three image prompts from the article prefix.
    Prompt,
    /// Synthesize the three images from the prompts.
    Illustrate,
    /// Splice image URLs into the article placeholders.
    Compose,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Extract => "extract",
            Stage::Draft => "draft",
            Stage::Prompt => "prompt",
            Stage::Illustrate => "illustrate",
            Stage::Compose => "compose",
        };
        f.write_str(name)
    }
}

/// All errors returned by the url2article library.
#[derive(Debug, Error)]
pub enum ArticleGenError {
    // ── Credential errors ─────────────────────────────────────────────────
    /// A required API key is absent or blank; nothing downstream can run.
    #[error("Missing {which} API key.\nProvide it before starting a run.")]
    MissingCredential { which: &'static str },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// Network or HTTP-status failure fetching a source URL.
    #[error("Failed to fetch '{url}': {reason}\nCheck the URL and your internet connection.")]
    Fetch { url: String, reason: String },

    /// Fetch exceeded the configured timeout.
    #[error("Fetching '{url}' timed out after {secs}s")]
    FetchTimeout { url: String, secs: u64 },

    /// The page fetched fine but contained no paragraph text.
    #[error("No paragraph text could be extracted from '{url}'")]
    EmptyExtraction { url: String },

    // ── Provider errors ───────────────────────────────────────────────────
    /// A text- or image-generation provider call failed.
    #[error("Provider error during {stage}: {detail}")]
    Provider { stage: Stage, detail: String },

    /// The text provider returned an empty completion.
    #[error("The text provider returned an empty result during {stage}")]
    EmptyCompletion { stage: Stage },

    /// An image-synthesis call returned no usable URL.
    #[error("Image {index} of 3 yielded an empty URL")]
    EmptyImageUrl { index: usize },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output Markdown file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ArticleGenError {
    /// The pipeline stage this error belongs to.
    ///
    /// Credential, config, and internal errors precede the pipeline and are
    /// attributed to [`Stage::Extract`], the first stage a run would enter.
    pub fn stage(&self) -> Stage {
        match self {
            ArticleGenError::Fetch { .. }
            | ArticleGenError::FetchTimeout { .. }
            | ArticleGenError::EmptyExtraction { .. }
            | ArticleGenError::MissingCredential { .. }
            | ArticleGenError::InvalidConfig(_)
            | ArticleGenError::Internal(_) => Stage::Extract,
            ArticleGenError::Provider { stage, .. } => *stage,
            ArticleGenError::EmptyCompletion { stage } => *stage,
            ArticleGenError::EmptyImageUrl { .. } => Stage::Illustrate,
            ArticleGenError::OutputWriteFailed { .. } => Stage::Compose,
        }
    }
}
