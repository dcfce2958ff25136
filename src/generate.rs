//! Generation entry points: the five-stage pipeline run end to end.
//!
//! Stages run strictly in order and each one gates the next — a failed fetch
//! means no drafting call is ever issued, a failed prompt means no image is
//! ever synthesized. There are no retries anywhere; the first error aborts
//! the run and carries the stage it happened in.

use crate::config::{GenerationConfig, IMAGE_SLOTS};
use crate::error::{ArticleGenError, Stage};
use crate::output::{ArticleOutput, RunStats};
use crate::pipeline::extract::SourceDocument;
use crate::pipeline::{compose, draft, illustrate, prompt};
use crate::progress::{NoopProgressCallback, RunProgressCallback};
use crate::session::Session;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// One article request: the three source URLs and the editorial knobs.
#[derive(Debug, Clone)]
pub struct ArticleRequest {
    /// Exactly three source URLs, fetched in this order.
    pub urls: [String; 3],
    /// The keyword the article targets.
    pub keyword: String,
    /// Who the article is written for.
    pub target_audience: String,
    /// The desired tone of voice.
    pub tone: String,
}

impl ArticleRequest {
    pub fn new(
        urls: [String; 3],
        keyword: impl Into<String>,
        target_audience: impl Into<String>,
        tone: impl Into<String>,
    ) -> Self {
        Self {
            urls,
            keyword: keyword.into(),
            target_audience: target_audience.into(),
            tone: tone.into(),
        }
    }

    /// Every field must be non-blank before a run may start.
    pub fn validate(&self) -> Result<(), ArticleGenError> {
        for (i, url) in self.urls.iter().enumerate() {
            if url.trim().is_empty() {
                return Err(ArticleGenError::InvalidConfig(format!(
                    "source URL {} is empty",
                    i + 1
                )));
            }
        }
        if self.keyword.trim().is_empty() {
            return Err(ArticleGenError::InvalidConfig("keyword is empty".into()));
        }
        if self.target_audience.trim().is_empty() {
            return Err(ArticleGenError::InvalidConfig(
                "target audience is empty".into(),
            ));
        }
        if self.tone.trim().is_empty() {
            return Err(ArticleGenError::InvalidConfig("tone is empty".into()));
        }
        Ok(())
    }
}

/// Run the full pipeline and return the composed article.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// Returns the first error any stage produces; no later stage runs after a
/// failure and nothing partial is returned. Use
/// [`ArticleGenError::stage`] to find out where a run stopped.
pub async fn generate(
    request: &ArticleRequest,
    session: &Session,
    config: &GenerationConfig,
) -> Result<ArticleOutput, ArticleGenError> {
    generate_with_progress(request, session, config, &NoopProgressCallback).await
}

/// Like [`generate`], with per-stage progress events.
pub async fn generate_with_progress(
    request: &ArticleRequest,
    session: &Session,
    config: &GenerationConfig,
    progress: &dyn RunProgressCallback,
) -> Result<ArticleOutput, ArticleGenError> {
    let total_start = Instant::now();
    request.validate()?;
    info!("starting run for keyword {:?}", request.keyword);
    progress.on_run_start(&request.keyword);

    // ── Stage 1: extract ─────────────────────────────────────────────────
    progress.on_stage_start(Stage::Extract);
    let extract_start = Instant::now();
    let mut sources = Vec::with_capacity(request.urls.len());
    for (i, url) in request.urls.iter().enumerate() {
        let text = match session.extractor().extract(url).await {
            Ok(text) => text,
            Err(e) => {
                progress.on_stage_error(Stage::Extract, &e.to_string());
                return Err(e);
            }
        };
        progress.on_item_complete(Stage::Extract, i + 1, request.urls.len());
        sources.push(SourceDocument {
            url: url.clone(),
            text,
        });
    }
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;
    progress.on_stage_complete(Stage::Extract, extract_duration_ms);
    let source_chars: Vec<usize> = sources.iter().map(|s| s.text.chars().count()).collect();
    info!(
        "extracted {} sources in {}ms",
        sources.len(),
        extract_duration_ms
    );

    // ── Stage 2: draft ───────────────────────────────────────────────────
    progress.on_stage_start(Stage::Draft);
    let draft_start = Instant::now();
    let combined = draft::combine_sources(&sources);
    let article = draft::draft_article(
        session.article_generator().as_ref(),
        &request.keyword,
        &request.target_audience,
        &request.tone,
        &combined,
        config,
    )
    .await
    .map_err(|e| {
        progress.on_stage_error(Stage::Draft, &e.to_string());
        e
    })?;
    let draft_duration_ms = draft_start.elapsed().as_millis() as u64;
    progress.on_stage_complete(Stage::Draft, draft_duration_ms);
    debug!("draft: {} chars in {}ms", article.len(), draft_duration_ms);

    // ── Stage 3: image prompts ───────────────────────────────────────────
    progress.on_stage_start(Stage::Prompt);
    let prompt_start = Instant::now();
    let prompts = prompt::draft_image_prompts(
        session.prompt_generator().as_ref(),
        &request.keyword,
        &request.tone,
        &article,
        config,
    )
    .await
    .map_err(|e| {
        progress.on_stage_error(Stage::Prompt, &e.to_string());
        e
    })?;
    let prompt_duration_ms = prompt_start.elapsed().as_millis() as u64;
    progress.on_stage_complete(Stage::Prompt, prompt_duration_ms);

    // ── Stage 4: illustrate ──────────────────────────────────────────────
    progress.on_stage_start(Stage::Illustrate);
    let illustrate_start = Instant::now();
    let image_urls = illustrate::synthesize_images(session.image_generator().as_ref(), &prompts)
        .await
        .map_err(|e| {
            progress.on_stage_error(Stage::Illustrate, &e.to_string());
            e
        })?;
    let illustrate_duration_ms = illustrate_start.elapsed().as_millis() as u64;
    progress.on_stage_complete(Stage::Illustrate, illustrate_duration_ms);

    // ── Stage 5: compose ─────────────────────────────────────────────────
    progress.on_stage_start(Stage::Compose);
    let markdown = compose::substitute_placeholders(&article, &image_urls);
    let unresolved = compose::remaining_placeholders(&markdown);
    if unresolved > 0 {
        info!("{} of {} placeholders unresolved", unresolved, IMAGE_SLOTS);
    }
    progress.on_stage_complete(Stage::Compose, 0);

    let stats = RunStats {
        source_chars,
        article_chars: article.chars().count(),
        image_links: compose::image_link_count(&markdown),
        unresolved_placeholders: unresolved,
        extract_duration_ms,
        draft_duration_ms,
        prompt_duration_ms,
        illustrate_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "run complete: {} chars of markdown in {}ms",
        markdown.len(),
        stats.total_duration_ms
    );
    progress.on_run_complete(stats.total_duration_ms, markdown.len());

    Ok(ArticleOutput {
        markdown,
        prompts,
        image_urls,
        stats,
    })
}

/// Run the pipeline and write the Markdown directly to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn generate_to_file(
    request: &ArticleRequest,
    session: &Session,
    config: &GenerationConfig,
    output_path: impl AsRef<Path>,
) -> Result<RunStats, ArticleGenError> {
    let output = generate(request, session, config).await?;
    write_markdown(output_path, &output.markdown).await?;
    Ok(output.stats)
}

/// Write Markdown to `path` atomically: parent dirs are created, content goes
/// to a sibling temp file and is renamed into place, so the target is never
/// left half-written.
pub async fn write_markdown(
    path: impl AsRef<Path>,
    markdown: &str,
) -> Result<(), ArticleGenError> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ArticleGenError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
    }

    let tmp_path = path.with_extension("md.tmp");
    tokio::fs::write(&tmp_path, markdown)
        .await
        .map_err(|e| ArticleGenError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| ArticleGenError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Synchronous wrapper around [`generate`].
///
/// Creates a temporary tokio runtime internally.
pub fn generate_sync(
    request: &ArticleRequest,
    session: &Session,
    config: &GenerationConfig,
) -> Result<ArticleOutput, ArticleGenError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ArticleGenError::Internal(format!("failed to create tokio runtime: {e}")))?
        .block_on(generate(request, session, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::extract::SourceExtractor;
    use crate::providers::{MockImageGenerator, MockTextGenerator};
    use crate::prompts::PLACEHOLDERS;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct FixedExtractor(Vec<Result<String, String>>);

    #[async_trait]
    impl SourceExtractor for FixedExtractor {
        async fn extract(&self, url: &str) -> Result<String, ArticleGenError> {
            let idx: usize = url.trim_start_matches("fixture://").parse().unwrap();
            match &self.0[idx] {
                Ok(text) => Ok(text.clone()),
                Err(_) => Err(ArticleGenError::EmptyExtraction {
                    url: url.to_string(),
                }),
            }
        }
    }

    fn request() -> ArticleRequest {
        ArticleRequest::new(
            [
                "fixture://0".into(),
                "fixture://1".into(),
                "fixture://2".into(),
            ],
            "rust async",
            "backend engineers",
            "practical",
        )
    }

    fn article_with_placeholders() -> String {
        format!(
            "# Rust Async\n\nIntro.\n\n{}\n\nBody.\n\n{}\n\nMore.\n\n{}\n",
            PLACEHOLDERS[0], PLACEHOLDERS[1], PLACEHOLDERS[2]
        )
    }

    fn session(
        extractor: FixedExtractor,
        article: Arc<MockTextGenerator>,
        prompts: Arc<MockTextGenerator>,
        images: Arc<MockImageGenerator>,
    ) -> Session {
        Session::with_providers(article, prompts, images, Arc::new(extractor))
    }

    #[tokio::test]
    async fn full_run_composes_article_and_stats() {
        let extractor = FixedExtractor(vec![
            Ok("alpha text".into()),
            Ok("beta text".into()),
            Ok("gamma text".into()),
        ]);
        let article_gen = Arc::new(MockTextGenerator::with_responses(vec![Ok(
            article_with_placeholders(),
        )]));
        let prompt_gen = Arc::new(MockTextGenerator::with_responses(vec![
            Ok("prompt one".into()),
            Ok("prompt two".into()),
            Ok("prompt three".into()),
        ]));
        let image_gen = Arc::new(MockImageGenerator::with_urls(vec![
            Ok("https://img.test/1.png".into()),
            Ok("https://img.test/2.png".into()),
            Ok("https://img.test/3.png".into()),
        ]));
        let session = session(
            extractor,
            Arc::clone(&article_gen),
            Arc::clone(&prompt_gen),
            Arc::clone(&image_gen),
        );

        let output = generate(&request(), &session, &GenerationConfig::default())
            .await
            .unwrap();

        assert!(output.markdown.contains("![Image 1](https://img.test/1.png)"));
        assert!(output.markdown.contains("![Image 3](https://img.test/3.png)"));
        assert!(!output.markdown.contains("image_placeholder"));
        assert_eq!(output.prompts.len(), 3);
        assert_eq!(output.image_urls.len(), 3);
        assert_eq!(output.stats.source_chars, vec![10, 9, 10]);
        assert_eq!(output.stats.image_links, 3);
        assert_eq!(output.stats.unresolved_placeholders, 0);
        assert_eq!(article_gen.call_count(), 1);
        assert_eq!(prompt_gen.call_count(), 3);
        assert_eq!(image_gen.call_count(), 3);
    }

    #[tokio::test]
    async fn extraction_failure_gates_all_generation() {
        let extractor = FixedExtractor(vec![
            Ok("alpha".into()),
            Err("empty".into()),
            Ok("gamma".into()),
        ]);
        let article_gen = Arc::new(MockTextGenerator::with_responses(vec![Ok(
            article_with_placeholders(),
        )]));
        let prompt_gen = Arc::new(MockTextGenerator::with_responses(vec![]));
        let image_gen = Arc::new(MockImageGenerator::with_urls(vec![]));
        let session = session(
            extractor,
            Arc::clone(&article_gen),
            Arc::clone(&prompt_gen),
            Arc::clone(&image_gen),
        );

        let err = generate(&request(), &session, &GenerationConfig::default())
            .await
            .unwrap_err();

        assert_eq!(err.stage(), Stage::Extract);
        assert_eq!(article_gen.call_count(), 0);
        assert_eq!(prompt_gen.call_count(), 0);
        assert_eq!(image_gen.call_count(), 0);
    }

    #[tokio::test]
    async fn draft_failure_gates_prompts_and_images() {
        let extractor = FixedExtractor(vec![Ok("a".into()), Ok("b".into()), Ok("c".into())]);
        let article_gen = Arc::new(MockTextGenerator::failing("provider down"));
        let prompt_gen = Arc::new(MockTextGenerator::with_responses(vec![]));
        let image_gen = Arc::new(MockImageGenerator::with_urls(vec![]));
        let session = session(
            extractor,
            article_gen,
            Arc::clone(&prompt_gen),
            Arc::clone(&image_gen),
        );

        let err = generate(&request(), &session, &GenerationConfig::default())
            .await
            .unwrap_err();

        assert_eq!(err.stage(), Stage::Draft);
        assert_eq!(prompt_gen.call_count(), 0);
        assert_eq!(image_gen.call_count(), 0);
    }

    #[tokio::test]
    async fn altered_placeholder_is_reported_not_fatal() {
        let extractor = FixedExtractor(vec![Ok("a".into()), Ok("b".into()), Ok("c".into())]);
        // Slot 2's placeholder was reworded by the model, so it no-ops.
        let article = format!(
            "Intro {} mid ![Image 2](placeholder_two) end {}",
            PLACEHOLDERS[0], PLACEHOLDERS[2]
        );
        let article_gen = Arc::new(MockTextGenerator::with_responses(vec![Ok(article)]));
        let prompt_gen = Arc::new(MockTextGenerator::with_responses(vec![
            Ok("p1".into()),
            Ok("p2".into()),
            Ok("p3".into()),
        ]));
        let image_gen = Arc::new(MockImageGenerator::with_urls(vec![
            Ok("u1".into()),
            Ok("u2".into()),
            Ok("u3".into()),
        ]));
        let session = session(extractor, article_gen, prompt_gen, image_gen);

        let output = generate(&request(), &session, &GenerationConfig::default())
            .await
            .unwrap();

        assert!(output.markdown.contains("![Image 1](u1)"));
        assert!(output.markdown.contains("![Image 2](placeholder_two)"));
        assert!(output.markdown.contains("![Image 3](u3)"));
        assert_eq!(output.stats.unresolved_placeholders, 0);
    }

    #[test]
    fn blank_keyword_is_rejected() {
        let mut req = request();
        req.keyword = "  ".into();
        assert!(matches!(
            req.validate().unwrap_err(),
            ArticleGenError::InvalidConfig(_)
        ));
    }

    #[test]
    fn blank_url_is_rejected() {
        let mut req = request();
        req.urls[1] = String::new();
        assert!(req.validate().is_err());
    }
}
