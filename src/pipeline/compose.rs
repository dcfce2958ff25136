//! Compose stage: splice image URLs into the article's placeholders.
//!
//! Substitution is literal and positional: placeholder N becomes the
//! Markdown image link for URL N, and everything else in the article is left
//! byte-for-byte untouched. If the text model altered a placeholder token,
//! that slot silently no-ops and the literal token stays in the output —
//! a known fragility of string-level templating, kept deliberately because
//! fuzzy matching would change observable behaviour.

use crate::config::IMAGE_SLOTS;
use crate::prompts::PLACEHOLDERS;
use once_cell::sync::Lazy;
use regex::Regex;

static IMAGE_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*\]\([^)]+\)").unwrap());

/// Replace each positional placeholder with its Markdown image link.
///
/// Idempotent: running it again on an already-composed article (no
/// placeholders left) changes nothing.
pub fn substitute_placeholders(article: &str, image_urls: &[String]) -> String {
    let mut composed = article.to_string();
    for (idx, url) in image_urls.iter().take(IMAGE_SLOTS).enumerate() {
        let link = format!("![Image {}]({})", idx + 1, url);
        composed = composed.replace(PLACEHOLDERS[idx], &link);
    }
    composed
}

/// How many of the positional placeholder tokens remain in the document.
pub fn remaining_placeholders(article: &str) -> usize {
    PLACEHOLDERS
        .iter()
        .filter(|p| article.contains(*p))
        .count()
}

/// Count Markdown image links (`![alt](url)`) in the document.
pub fn image_link_count(article: &str) -> usize {
    IMAGE_LINK_RE.find_iter(article).count()
}
