//! End-to-end integration tests for url2article.
//!
//! Most tests drive the full pipeline through the public API with scripted
//! providers, so they run everywhere with no keys and no network. The final
//! section makes live API calls and is gated behind the `E2E_ENABLED`
//! environment variable so it does not run in CI unless explicitly requested.
//!
//! Run with:
//!   cargo test --test e2e -- --nocapture
//!
//! Live tests additionally need ANTHROPIC_API_KEY and OPENAI_API_KEY:
//!   E2E_ENABLED=1 cargo test --test e2e live_ -- --nocapture

use async_trait::async_trait;
use std::sync::Arc;
use url2article::pipeline::extract::SourceExtractor;
use url2article::providers::{ImageGenerator, MockImageGenerator, MockTextGenerator, TextGenerator};
use url2article::prompts::PLACEHOLDERS;
use url2article::{
    generate, ArticleGenError, ArticleRequest, Credentials, GenerationConfig, Session, Stage,
};

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Extractor scripted per URL: `ok://<text>` succeeds, anything else fails.
struct ScriptedExtractor;

#[async_trait]
impl SourceExtractor for ScriptedExtractor {
    async fn extract(&self, url: &str) -> Result<String, ArticleGenError> {
        match url.strip_prefix("ok://") {
            Some(text) => Ok(text.to_string()),
            None => Err(ArticleGenError::EmptyExtraction {
                url: url.to_string(),
            }),
        }
    }
}

fn request() -> ArticleRequest {
    ArticleRequest::new(
        [
            "ok://brewing basics".into(),
            "ok://grind size matters".into(),
            "ok://water temperature".into(),
        ],
        "espresso at home",
        "home baristas",
        "friendly and precise",
    )
}

fn placeholder_article() -> String {
    format!(
        "# Espresso at Home\n\nIntro paragraph.\n\n{}\n\n## Grind\n\nBody.\n\n{}\n\n## Water\n\nMore body.\n\n{}\n\nConclusion.\n",
        PLACEHOLDERS[0], PLACEHOLDERS[1], PLACEHOLDERS[2]
    )
}

fn happy_session() -> (
    Session,
    Arc<MockTextGenerator>,
    Arc<MockTextGenerator>,
    Arc<MockImageGenerator>,
) {
    let article_gen = Arc::new(MockTextGenerator::with_responses(vec![Ok(
        placeholder_article(),
    )]));
    let prompt_gen = Arc::new(MockTextGenerator::with_responses(vec![
        Ok("A portafilter in warm morning light".into()),
        Ok("Coffee beans spilling from a grinder".into()),
        Ok("Steam rising from a ceramic cup".into()),
    ]));
    let image_gen = Arc::new(MockImageGenerator::with_urls(vec![
        Ok("https://img.test/espresso-1.png".into()),
        Ok("https://img.test/espresso-2.png".into()),
        Ok("https://img.test/espresso-3.png".into()),
    ]));
    let session = Session::with_providers(
        Arc::clone(&article_gen) as Arc<dyn TextGenerator>,
        Arc::clone(&prompt_gen) as Arc<dyn TextGenerator>,
        Arc::clone(&image_gen) as Arc<dyn ImageGenerator>,
        Arc::new(ScriptedExtractor),
    );
    (session, article_gen, prompt_gen, image_gen)
}

// ── Full-pipeline tests with scripted providers (always run) ─────────────────

#[tokio::test]
async fn full_run_produces_composed_markdown() {
    let (session, article_gen, prompt_gen, image_gen) = happy_session();

    let output = generate(&request(), &session, &GenerationConfig::default())
        .await
        .expect("full run should succeed");

    // All three placeholders became positional image links.
    assert!(output
        .markdown
        .contains("![Image 1](https://img.test/espresso-1.png)"));
    assert!(output
        .markdown
        .contains("![Image 2](https://img.test/espresso-2.png)"));
    assert!(output
        .markdown
        .contains("![Image 3](https://img.test/espresso-3.png)"));
    assert!(!output.markdown.contains("image_placeholder"));

    // Prose outside the placeholders is untouched.
    assert!(output.markdown.starts_with("# Espresso at Home"));
    assert!(output.markdown.contains("Conclusion.\n"));

    // One draft call, three prompt calls, three image calls.
    assert_eq!(article_gen.call_count(), 1);
    assert_eq!(prompt_gen.call_count(), 3);
    assert_eq!(image_gen.call_count(), 3);

    assert_eq!(output.prompts.len(), 3);
    assert_eq!(output.image_urls.len(), 3);
    assert_eq!(output.stats.image_links, 3);
    assert_eq!(output.stats.unresolved_placeholders, 0);
}

#[tokio::test]
async fn prompts_and_urls_keep_slot_order() {
    let (session, _, _, _) = happy_session();

    let output = generate(&request(), &session, &GenerationConfig::default())
        .await
        .unwrap();

    assert_eq!(output.prompts[0], "A portafilter in warm morning light");
    assert_eq!(output.prompts[2], "Steam rising from a ceramic cup");
    assert_eq!(output.image_urls[0], "https://img.test/espresso-1.png");
    assert_eq!(output.image_urls[2], "https://img.test/espresso-3.png");
}

#[tokio::test]
async fn failed_fetch_stops_before_any_model_call() {
    let (_, article_gen, prompt_gen, image_gen) = happy_session();
    let session = Session::with_providers(
        Arc::clone(&article_gen) as Arc<dyn TextGenerator>,
        Arc::clone(&prompt_gen) as Arc<dyn TextGenerator>,
        Arc::clone(&image_gen) as Arc<dyn ImageGenerator>,
        Arc::new(ScriptedExtractor),
    );

    let mut req = request();
    req.urls[0] = "broken://nothing".into();

    let err = generate(&req, &session, &GenerationConfig::default())
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Stage::Extract);
    assert_eq!(article_gen.call_count(), 0);
    assert_eq!(prompt_gen.call_count(), 0);
    assert_eq!(image_gen.call_count(), 0);
}

#[tokio::test]
async fn failed_draft_stops_before_prompts_and_images() {
    let article_gen = Arc::new(MockTextGenerator::failing("503 service unavailable"));
    let prompt_gen = Arc::new(MockTextGenerator::with_responses(vec![]));
    let image_gen = Arc::new(MockImageGenerator::with_urls(vec![]));
    let session = Session::with_providers(
        article_gen,
        Arc::clone(&prompt_gen) as Arc<dyn TextGenerator>,
        Arc::clone(&image_gen) as Arc<dyn ImageGenerator>,
        Arc::new(ScriptedExtractor),
    );

    let err = generate(&request(), &session, &GenerationConfig::default())
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Stage::Draft);
    assert_eq!(prompt_gen.call_count(), 0);
    assert_eq!(image_gen.call_count(), 0);
}

#[tokio::test]
async fn mid_stage_prompt_failure_halts_without_image_calls() {
    let article_gen = Arc::new(MockTextGenerator::with_responses(vec![Ok(
        placeholder_article(),
    )]));
    // Second prompt call fails: the stage must stop there, with exactly two
    // prompt calls observed and zero image calls.
    let prompt_gen = Arc::new(MockTextGenerator::with_responses(vec![
        Ok("first prompt".into()),
        Err("rate limited".into()),
        Ok("never reached".into()),
    ]));
    let image_gen = Arc::new(MockImageGenerator::with_urls(vec![
        Ok("https://img.test/1.png".into()),
    ]));
    let session = Session::with_providers(
        article_gen,
        Arc::clone(&prompt_gen) as Arc<dyn TextGenerator>,
        Arc::clone(&image_gen) as Arc<dyn ImageGenerator>,
        Arc::new(ScriptedExtractor),
    );

    let err = generate(&request(), &session, &GenerationConfig::default())
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Stage::Prompt);
    assert_eq!(prompt_gen.call_count(), 2);
    assert_eq!(image_gen.call_count(), 0);
}

#[tokio::test]
async fn mid_stage_image_failure_discards_partial_results() {
    let article_gen = Arc::new(MockTextGenerator::with_responses(vec![Ok(
        placeholder_article(),
    )]));
    let prompt_gen = Arc::new(MockTextGenerator::with_responses(vec![
        Ok("p1".into()),
        Ok("p2".into()),
        Ok("p3".into()),
    ]));
    let image_gen = Arc::new(MockImageGenerator::with_urls(vec![
        Ok("https://img.test/1.png".into()),
        Err("content policy".into()),
        Ok("https://img.test/3.png".into()),
    ]));
    let session = Session::with_providers(
        article_gen,
        prompt_gen,
        Arc::clone(&image_gen) as Arc<dyn ImageGenerator>,
        Arc::new(ScriptedExtractor),
    );

    let err = generate(&request(), &session, &GenerationConfig::default())
        .await
        .unwrap_err();

    // The run fails outright; the one synthesized image is never composed.
    assert_eq!(err.stage(), Stage::Illustrate);
    assert_eq!(image_gen.call_count(), 2);
}

#[tokio::test]
async fn blank_image_url_fails_with_slot_index() {
    let article_gen = Arc::new(MockTextGenerator::with_responses(vec![Ok(
        placeholder_article(),
    )]));
    let prompt_gen = Arc::new(MockTextGenerator::with_responses(vec![
        Ok("p1".into()),
        Ok("p2".into()),
        Ok("p3".into()),
    ]));
    let image_gen = Arc::new(MockImageGenerator::with_urls(vec![
        Ok("https://img.test/1.png".into()),
        Ok("   ".into()),
        Ok("https://img.test/3.png".into()),
    ]));
    let session = Session::with_providers(
        article_gen,
        prompt_gen,
        image_gen,
        Arc::new(ScriptedExtractor),
    );

    let err = generate(&request(), &session, &GenerationConfig::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ArticleGenError::EmptyImageUrl { index: 2 }));
}

#[tokio::test]
async fn output_serialises_to_json_and_back() {
    let (session, _, _, _) = happy_session();

    let output = generate(&request(), &session, &GenerationConfig::default())
        .await
        .unwrap();

    let json = serde_json::to_string_pretty(&output).expect("ArticleOutput must serialise");
    let back: url2article::ArticleOutput =
        serde_json::from_str(&json).expect("JSON must deserialize back to ArticleOutput");
    assert_eq!(back.markdown, output.markdown);
    assert_eq!(back.stats.image_links, output.stats.image_links);
}

// ── Session and credential tests (always run) ────────────────────────────────

#[test]
fn missing_key_blocks_session_construction() {
    let config = GenerationConfig::default();

    let err = Session::new(&Credentials::new("", "sk-img"), &config).unwrap_err();
    assert!(matches!(
        err,
        ArticleGenError::MissingCredential { which: "text" }
    ));

    let err = Session::new(&Credentials::new("sk-txt", "  "), &config).unwrap_err();
    assert!(matches!(
        err,
        ArticleGenError::MissingCredential { which: "image" }
    ));
}

#[tokio::test]
async fn replacing_a_session_switches_providers_for_later_runs() {
    // Runs against the first session use its providers; building a new
    // session and using it for the next run must not touch the old ones.
    let old_article = Arc::new(MockTextGenerator::with_responses(vec![Ok(
        placeholder_article(),
    )]));
    let old_prompts = Arc::new(MockTextGenerator::with_responses(vec![
        Ok("old-1".into()),
        Ok("old-2".into()),
        Ok("old-3".into()),
    ]));
    let old_images = Arc::new(MockImageGenerator::with_urls(vec![
        Ok("https://old.test/1.png".into()),
        Ok("https://old.test/2.png".into()),
        Ok("https://old.test/3.png".into()),
    ]));
    let old_session = Session::with_providers(
        Arc::clone(&old_article) as Arc<dyn TextGenerator>,
        Arc::clone(&old_prompts) as Arc<dyn TextGenerator>,
        Arc::clone(&old_images) as Arc<dyn ImageGenerator>,
        Arc::new(ScriptedExtractor),
    );

    let first = generate(&request(), &old_session, &GenerationConfig::default())
        .await
        .unwrap();
    assert!(first.markdown.contains("https://old.test/1.png"));

    let (new_session, _, _, _) = happy_session();
    let second = generate(&request(), &new_session, &GenerationConfig::default())
        .await
        .unwrap();

    assert!(second.markdown.contains("https://img.test/espresso-1.png"));
    assert!(!second.markdown.contains("old.test"));
    // The replaced session's providers saw no further traffic.
    assert_eq!(old_article.call_count(), 1);
    assert_eq!(old_prompts.call_count(), 3);
    assert_eq!(old_images.call_count(), 3);
}

#[tokio::test]
async fn generate_to_file_writes_final_markdown_atomically() {
    let (session, _, _, _) = happy_session();
    let dir = std::env::temp_dir().join("url2article-e2e");
    let out_path = dir.join("article.md");

    let stats = url2article::generate_to_file(
        &request(),
        &session,
        &GenerationConfig::default(),
        &out_path,
    )
    .await
    .expect("generate_to_file should succeed");

    let written = std::fs::read_to_string(&out_path).expect("output file must exist");
    assert!(written.contains("![Image 2](https://img.test/espresso-2.png)"));
    assert_eq!(stats.image_links, 3);
    assert!(
        !dir.join("article.md.tmp").exists(),
        "temp file must be renamed away"
    );

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn write_markdown_creates_parents_and_cleans_up_temp_file() {
    let dir = std::env::temp_dir().join("url2article-write-markdown");
    let out_path = dir.join("nested").join("article.md");

    url2article::write_markdown(&out_path, "# Crema\n")
        .await
        .expect("write_markdown should succeed");

    let written = std::fs::read_to_string(&out_path).expect("output file must exist");
    assert_eq!(written, "# Crema\n");
    assert!(
        !out_path.with_extension("md.tmp").exists(),
        "temp file must be renamed away"
    );

    std::fs::remove_dir_all(&dir).ok();
}

// ── Live API tests (need E2E_ENABLED + both keys) ────────────────────────────

fn live_credentials() -> Option<Credentials> {
    if std::env::var("E2E_ENABLED").is_err() {
        println!("SKIP — set E2E_ENABLED=1 to run live tests");
        return None;
    }
    let text_key = match std::env::var("ANTHROPIC_API_KEY") {
        Ok(k) if !k.is_empty() => k,
        _ => {
            println!("SKIP — ANTHROPIC_API_KEY not set");
            return None;
        }
    };
    let image_key = match std::env::var("OPENAI_API_KEY") {
        Ok(k) if !k.is_empty() => k,
        _ => {
            println!("SKIP — OPENAI_API_KEY not set");
            return None;
        }
    };
    Some(Credentials::new(text_key, image_key))
}

/// Full live run against real endpoints. Costs real money; keep the sources
/// small and stable.
#[tokio::test]
async fn live_full_generation() {
    let Some(credentials) = live_credentials() else {
        return;
    };

    let config = GenerationConfig::default();
    let session = Session::new(&credentials, &config).expect("session must build");

    let request = ArticleRequest::new(
        [
            "https://en.wikipedia.org/wiki/Espresso".into(),
            "https://en.wikipedia.org/wiki/Coffee".into(),
            "https://en.wikipedia.org/wiki/Moka_pot".into(),
        ],
        "brewing espresso at home",
        "home baristas",
        "friendly and practical",
    );

    let output = generate(&request, &session, &config)
        .await
        .expect("live generation should succeed");

    assert!(!output.markdown.trim().is_empty());
    assert_eq!(output.prompts.len(), 3);
    assert_eq!(output.image_urls.len(), 3);
    for url in &output.image_urls {
        assert!(url.starts_with("http"), "image URL should be absolute: {url}");
    }

    println!(
        "[live] {} chars of markdown, {} image links, {}ms total",
        output.markdown.len(),
        output.stats.image_links,
        output.stats.total_duration_ms
    );
    println!("--- BEGIN OUTPUT ---\n{}\n--- END OUTPUT ---", output.markdown);
}

/// Live extraction only: confirms the paragraph scrape works on a real page
/// without spending model tokens.
#[tokio::test]
async fn live_extraction_yields_paragraph_text() {
    if std::env::var("E2E_ENABLED").is_err() {
        println!("SKIP — set E2E_ENABLED=1 to run live tests");
        return;
    }

    use url2article::pipeline::extract::HttpExtractor;

    let extractor = HttpExtractor::new(30).expect("client construction should succeed");
    let text = extractor
        .extract("https://en.wikipedia.org/wiki/Espresso")
        .await
        .expect("extraction should succeed");

    assert!(text.len() > 500, "expected substantial paragraph text");
    assert!(text.to_lowercase().contains("espresso"));
    println!("[live-extract] {} chars", text.len());
}
