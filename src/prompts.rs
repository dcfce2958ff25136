//! Prompt templates for article and image-prompt drafting.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — the placeholder tokens appear in the
//!    article template and in [`crate::pipeline::compose`]; keeping both
//!    derived from [`PLACEHOLDERS`] means they can never drift apart.
//!
//! 2. **Testability** — unit tests can inspect the built prompts directly
//!    without calling a real provider, making template regressions easy to
//!    catch.

use crate::config::IMAGE_SLOTS;

/// The literal placeholder tokens the article template asks the model to
/// embed, in positional order. Slot N of the compose stage replaces
/// `PLACEHOLDERS[N]` with the Markdown image link for image N.
///
/// Substitution is literal: if the model paraphrases a token, that slot is
/// left untouched in the final document.
pub const PLACEHOLDERS: [&str; IMAGE_SLOTS] = [
    "![Image 1](image_placeholder_1)",
    "![Image 2](image_placeholder_2)",
    "![Image 3](image_placeholder_3)",
];

/// System role for the article-drafting call.
pub const ARTICLE_SYSTEM_ROLE: &str = "You are an expert SEO content writer.";

/// System role for the image-prompt drafting calls.
pub const PROMPT_SYSTEM_ROLE: &str =
    "You are a creative prompt engineer for image generation.";

/// Build the user prompt for the article-drafting call.
///
/// `combined_text` is the three extracted source texts joined with blank
/// lines; it is supplied as inspiration, not for copying.
pub fn article_prompt(
    keyword: &str,
    target_audience: &str,
    tone: &str,
    combined_text: &str,
) -> String {
    format!(
        r#"Your task is to create a high-quality, SEO-optimized blog article based on the following information:

Keyword: {keyword}
Target Audience: {target_audience}
Tone: {tone}

Use the following text as a source of information, but do not copy it directly. Instead, use it as inspiration to create original content:

{combined_text}

Your article should:
1. Have an engaging title that includes the keyword
2. Include an SEO-optimized meta description
3. Be well-structured with headings and subheadings
4. Naturally incorporate the keyword throughout the text
5. Be informative and valuable to the target audience
6. Maintain the specified tone throughout
7. Be between 800-1000 words long

Please format the article in Markdown, including placeholders for three images: {p1}, {p2}, {p3}."#,
        p1 = PLACEHOLDERS[0],
        p2 = PLACEHOLDERS[1],
        p3 = PLACEHOLDERS[2],
    )
}

/// Build the user prompt for one image-prompt drafting call.
///
/// `article_prefix` is a fixed-length prefix of the drafted article — enough
/// context to stay on-topic without resending the whole draft.
pub fn image_prompt_prompt(keyword: &str, tone: &str, article_prefix: &str) -> String {
    format!(
        r#"Based on the following information, create a detailed and creative prompt for generating an illustrative image:

Keyword: {keyword}
Tone: {tone}
Article content: {article_prefix}

The prompt should:
1. Be vivid and descriptive
2. Reflect the keyword and tone
3. Relate to the content of the article
4. Be suitable for image generation
5. Be about 50-100 words long

Generate the image prompt:"#
    )
}

/// Take the first `n` characters of `article`, respecting char boundaries.
pub fn article_prefix(article: &str, n: usize) -> &str {
    match article.char_indices().nth(n) {
        Some((idx, _)) => &article[..idx],
        None => article,
    }
}
