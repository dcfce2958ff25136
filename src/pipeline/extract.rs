//! Source extraction: fetch a URL and pull out its paragraph text.
//!
//! A single GET per URL, no retries. Parsing selects every `<p>` element and
//! joins their text content with single spaces, preserving document order —
//! no deduplication, no length capping. An empty result is fatal for the
//! run, so it surfaces as an error here rather than as an empty string the
//! caller could forget to check.

use crate::error::ArticleGenError;
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, info};

const USER_AGENT: &str = concat!("url2article/", env!("CARGO_PKG_VERSION"));

/// One fetched-and-extracted source.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub url: String,
    pub text: String,
}

/// Extraction seam: `extract(url) -> text`.
///
/// The HTTP implementation is [`HttpExtractor`]; tests substitute a scripted
/// implementation through [`crate::session::Session::with_providers`].
#[async_trait]
pub trait SourceExtractor: Send + Sync {
    /// Fetch the URL and return its concatenated paragraph text.
    ///
    /// Empty extraction and transport failures are both errors; callers must
    /// treat either as fatal for the run.
    async fn extract(&self, url: &str) -> Result<String, ArticleGenError>;
}

/// Reqwest-backed extractor.
pub struct HttpExtractor {
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpExtractor {
    /// Fails only if the TLS backend cannot be initialised.
    pub fn new(timeout_secs: u64) -> Result<Self, ArticleGenError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                ArticleGenError::Internal(format!("failed to build http client: {e}"))
            })?;
        Ok(Self {
            timeout_secs,
            client,
        })
    }
}

#[async_trait]
impl SourceExtractor for HttpExtractor {
    async fn extract(&self, url: &str) -> Result<String, ArticleGenError> {
        info!("fetching source: {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ArticleGenError::FetchTimeout {
                    url: url.to_string(),
                    secs: self.timeout_secs,
                }
            } else {
                ArticleGenError::Fetch {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        if !response.status().is_success() {
            return Err(ArticleGenError::Fetch {
                url: url.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let html = response.text().await.map_err(|e| ArticleGenError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let text = paragraph_text(&html);
        debug!("extracted {} chars from {}", text.len(), url);

        if text.is_empty() {
            return Err(ArticleGenError::EmptyExtraction {
                url: url.to_string(),
            });
        }

        Ok(text)
    }
}

/// Concatenate the text of every `<p>` element, document order, single-space
/// separated, whitespace-normalised per paragraph.
pub fn paragraph_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let p_sel = Selector::parse("p").unwrap();

    document
        .select(&p_sel)
        .map(|el| {
            el.text()
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
