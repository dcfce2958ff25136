//! Prompt stage: three serial text-generation calls, one image prompt each.
//!
//! Every call re-supplies the same keyword, tone, and a fixed-length prefix
//! of the drafted article, so the three prompts are independent of one
//! another. They are issued one at a time — ordering is part of the
//! reference behaviour and is preserved.

use crate::config::{GenerationConfig, IMAGE_SLOTS};
use crate::error::{ArticleGenError, Stage};
use crate::prompts;
use crate::providers::TextGenerator;
use tracing::{debug, info};

/// Generate one image prompt per slot, serially.
pub async fn draft_image_prompts(
    generator: &dyn TextGenerator,
    keyword: &str,
    tone: &str,
    article: &str,
    config: &GenerationConfig,
) -> Result<Vec<String>, ArticleGenError> {
    let prefix = prompts::article_prefix(article, config.article_prefix_chars);
    info!(
        "drafting {} image prompts with {} ({} chars of context)",
        IMAGE_SLOTS,
        config.prompt_model,
        prefix.chars().count()
    );

    let user_prompt = prompts::image_prompt_prompt(keyword, tone, prefix);

    let mut drafted = Vec::with_capacity(IMAGE_SLOTS);
    for slot in 1..=IMAGE_SLOTS {
        let text = generator
            .complete(
                prompts::PROMPT_SYSTEM_ROLE,
                &user_prompt,
                config.prompt_max_tokens,
                config.temperature,
            )
            .await
            .map_err(|e| ArticleGenError::Provider {
                stage: Stage::Prompt,
                detail: e.to_string(),
            })?;

        if text.trim().is_empty() {
            return Err(ArticleGenError::EmptyCompletion {
                stage: Stage::Prompt,
            });
        }

        debug!("prompt {}/{}: {} chars", slot, IMAGE_SLOTS, text.len());
        drafted.push(text);
    }

    Ok(drafted)
}
