//! Draft stage: one text-generation call producing the Markdown article.

use crate::config::GenerationConfig;
use crate::error::{ArticleGenError, Stage};
use crate::pipeline::extract::SourceDocument;
use crate::prompts;
use crate::providers::TextGenerator;
use tracing::{debug, info};

/// Join extracted source texts with blank lines, in input order.
pub fn combine_sources(sources: &[SourceDocument]) -> String {
    sources
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Ask the text provider for the article draft.
///
/// An empty completion is treated as a failed stage — downstream stages must
/// never see an article without generation output in it.
pub async fn draft_article(
    generator: &dyn TextGenerator,
    keyword: &str,
    target_audience: &str,
    tone: &str,
    combined_text: &str,
    config: &GenerationConfig,
) -> Result<String, ArticleGenError> {
    info!("drafting article with {}", config.article_model);
    debug!("combined source text: {} chars", combined_text.len());

    let user_prompt = prompts::article_prompt(keyword, target_audience, tone, combined_text);

    let article = generator
        .complete(
            prompts::ARTICLE_SYSTEM_ROLE,
            &user_prompt,
            config.article_max_tokens,
            config.temperature,
        )
        .await
        .map_err(|e| ArticleGenError::Provider {
            stage: Stage::Draft,
            detail: e.to_string(),
        })?;

    if article.trim().is_empty() {
        return Err(ArticleGenError::EmptyCompletion { stage: Stage::Draft });
    }

    debug!("draft: {} chars", article.len());
    Ok(article)
}
