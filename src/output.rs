//! Output types: the composed article plus per-run statistics.

use serde::{Deserialize, Serialize};

/// Result of a successful generation run.
///
/// Only complete runs produce one of these — a failed stage returns
/// `Err(ArticleGenError)` and nothing partial survives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleOutput {
    /// The final Markdown document with image links spliced in.
    pub markdown: String,
    /// The three generated image prompts, in slot order.
    pub prompts: Vec<String>,
    /// The three provider-hosted image URLs, in slot order.
    pub image_urls: Vec<String>,
    /// Timing and size statistics for the run.
    pub stats: RunStats,
}

/// Statistics for one generation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// Characters of extracted text per source URL, in input order.
    pub source_chars: Vec<usize>,
    /// Characters in the drafted article (before composition).
    pub article_chars: usize,
    /// Markdown image links in the final document.
    pub image_links: usize,
    /// Positional placeholder tokens still present in the final document.
    /// Zero after any complete run; exposed for embedders that compose
    /// incrementally.
    pub unresolved_placeholders: usize,
    /// Wall-clock milliseconds spent fetching and extracting sources.
    pub extract_duration_ms: u64,
    /// Wall-clock milliseconds spent drafting the article.
    pub draft_duration_ms: u64,
    /// Wall-clock milliseconds spent drafting the image prompts.
    pub prompt_duration_ms: u64,
    /// Wall-clock milliseconds spent synthesizing images.
    pub illustrate_duration_ms: u64,
    /// Wall-clock milliseconds for the whole run.
    pub total_duration_ms: u64,
}
