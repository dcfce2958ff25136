//! Illustrate stage: three serial image-synthesis calls, one URL each.
//!
//! Prompt N produces image N — the 1:1 mapping is positional and is what the
//! compose stage relies on. A blank URL from the provider fails the run; the
//! image itself is never downloaded or validated.

use crate::error::{ArticleGenError, Stage};
use crate::providers::ImageGenerator;
use tracing::{debug, info};

/// Synthesize one image per prompt, serially, returning URLs in prompt order.
pub async fn synthesize_images(
    generator: &dyn ImageGenerator,
    prompts: &[String],
) -> Result<Vec<String>, ArticleGenError> {
    info!("synthesizing {} images", prompts.len());

    let mut urls = Vec::with_capacity(prompts.len());
    for (idx, prompt) in prompts.iter().enumerate() {
        let url = generator
            .synthesize(prompt)
            .await
            .map_err(|e| ArticleGenError::Provider {
                stage: Stage::Illustrate,
                detail: e.to_string(),
            })?;

        if url.trim().is_empty() {
            return Err(ArticleGenError::EmptyImageUrl { index: idx + 1 });
        }

        debug!("image {}/{}: {}", idx + 1, prompts.len(), url);
        urls.push(url);
    }

    Ok(urls)
}
