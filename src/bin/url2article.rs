//! CLI binary for url2article.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `GenerationConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use url2article::{
    generate_with_progress, write_markdown, ArticleRequest, Credentials, GenerationConfig,
    NoopProgressCallback, ProgressCallback, RunProgressCallback, Session, Stage,
};

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a spinner anchored at the bottom plus one log
/// line per completed stage.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }

    fn stage_label(stage: Stage) -> &'static str {
        match stage {
            Stage::Extract => "Reading sources",
            Stage::Draft => "Drafting article",
            Stage::Prompt => "Writing image prompts",
            Stage::Illustrate => "Synthesizing images",
            Stage::Compose => "Composing",
        }
    }
}

impl RunProgressCallback for CliProgressCallback {
    fn on_run_start(&self, keyword: &str) {
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Generating article for “{keyword}”…"))
        ));
    }

    fn on_stage_start(&self, stage: Stage) {
        self.bar.set_prefix(Self::stage_label(stage));
        self.bar.set_message("");
    }

    fn on_item_complete(&self, _stage: Stage, item: usize, total: usize) {
        self.bar.set_message(format!("{item}/{total}"));
    }

    fn on_stage_complete(&self, stage: Stage, elapsed_ms: u64) {
        self.bar.println(format!(
            "  {} {:<22} {}",
            green("✓"),
            Self::stage_label(stage),
            dim(&format!("{:.1}s", elapsed_ms as f64 / 1000.0)),
        ));
    }

    fn on_stage_error(&self, stage: Stage, error: &str) {
        // Truncate very long error messages to keep output tidy. Provider
        // errors embed raw response bodies, so slice on char boundaries.
        let msg = truncate_error(error, 120);
        self.bar.println(format!(
            "  {} {:<22} {}",
            red("✗"),
            Self::stage_label(stage),
            red(&msg),
        ));
    }

    fn on_run_complete(&self, total_ms: u64, markdown_len: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} article ready  {}  {}",
            green("✔"),
            dim(&format!("{markdown_len} chars")),
            dim(&format!("{:.1}s", total_ms as f64 / 1000.0)),
        );
    }
}

/// Cap a message at `max_chars` characters, appending an ellipsis when cut.
fn truncate_error(error: &str, max_chars: usize) -> String {
    if error.chars().count() <= max_chars {
        return error.to_string();
    }
    let head: String = error.chars().take(max_chars - 1).collect();
    format!("{head}\u{2026}")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic run (markdown on stdout)
  url2article https://a.example https://b.example https://c.example \
      --keyword "rust async runtimes" --audience "backend engineers" --tone practical

  # Write to a file
  url2article <url> <url> <url> -k espresso -a "home baristas" -t friendly -o article.md

  # Structured JSON (article + prompts + image URLs + stats)
  url2article <url> <url> <url> -k espresso -a "home baristas" -t friendly --json

  # Override models
  url2article <url> <url> <url> -k tea -a "tea drinkers" -t calm \
      --article-model claude-3-5-sonnet-20240620 --image-model dall-e-3

ENVIRONMENT VARIABLES:
  ANTHROPIC_API_KEY   Key for the article-drafting model
  OPENAI_API_KEY      Key for prompt drafting and image synthesis

SETUP:
  1. Set keys:   export ANTHROPIC_API_KEY=sk-ant-...  OPENAI_API_KEY=sk-...
  2. Run:        url2article <url> <url> <url> -k <keyword> -a <audience> -t <tone>
"#;

/// Draft an illustrated Markdown article from three source URLs.
#[derive(Parser, Debug)]
#[command(
    name = "url2article",
    version,
    about = "Draft an illustrated Markdown article from three source URLs",
    long_about = "Reads the paragraph text of three reference pages, drafts a keyword-focused \
Markdown article with a text model, generates three matching images, and splices the image \
URLs into the draft.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Exactly three source URLs, read in this order.
    #[arg(num_args = 3, value_name = "URL")]
    urls: Vec<String>,

    /// Keyword the article targets.
    #[arg(short, long, env = "URL2ARTICLE_KEYWORD")]
    keyword: String,

    /// Who the article is written for.
    #[arg(short, long, env = "URL2ARTICLE_AUDIENCE")]
    audience: String,

    /// Desired tone of voice.
    #[arg(short, long, env = "URL2ARTICLE_TONE")]
    tone: String,

    /// Write Markdown to this file instead of stdout.
    #[arg(short, long, env = "URL2ARTICLE_OUTPUT")]
    output: Option<PathBuf>,

    /// API key for article drafting (Anthropic messages endpoint).
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    anthropic_api_key: String,

    /// API key for prompt drafting and image synthesis (OpenAI).
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: String,

    /// Model for the article draft.
    #[arg(long, env = "URL2ARTICLE_ARTICLE_MODEL")]
    article_model: Option<String>,

    /// Model for the image prompts.
    #[arg(long, env = "URL2ARTICLE_PROMPT_MODEL")]
    prompt_model: Option<String>,

    /// Model for image synthesis.
    #[arg(long, env = "URL2ARTICLE_IMAGE_MODEL")]
    image_model: Option<String>,

    /// Generated image size, e.g. 1024x1024.
    #[arg(long, env = "URL2ARTICLE_IMAGE_SIZE")]
    image_size: Option<String>,

    /// Max output tokens for the article draft.
    #[arg(long, env = "URL2ARTICLE_MAX_TOKENS", default_value_t = 4096)]
    max_tokens: u32,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, env = "URL2ARTICLE_TEMPERATURE", default_value_t = 0.7)]
    temperature: f32,

    /// Source fetch timeout in seconds.
    #[arg(long, env = "URL2ARTICLE_FETCH_TIMEOUT", default_value_t = 30)]
    fetch_timeout: u64,

    /// Per-call model API timeout in seconds.
    #[arg(long, env = "URL2ARTICLE_API_TIMEOUT", default_value_t = 120)]
    api_timeout: u64,

    /// Output structured JSON (ArticleOutput) instead of Markdown.
    #[arg(long, env = "URL2ARTICLE_JSON")]
    json: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "URL2ARTICLE_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "URL2ARTICLE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the article itself.
    #[arg(short, long, env = "URL2ARTICLE_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the spinner is active; the
    // spinner provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config, session, request ───────────────────────────────────
    let config = build_config(&cli).context("Invalid configuration")?;

    let credentials = Credentials::new(&cli.anthropic_api_key, &cli.openai_api_key);
    let session = Session::new(&credentials, &config).context("Failed to build session")?;

    let urls: [String; 3] = cli
        .urls
        .clone()
        .try_into()
        .map_err(|_| anyhow::anyhow!("exactly three source URLs are required"))?;
    let request = ArticleRequest::new(urls, &cli.keyword, &cli.audience, &cli.tone);

    let progress_cb: ProgressCallback = if show_progress {
        CliProgressCallback::new()
    } else {
        Arc::new(NoopProgressCallback)
    };

    // ── Run the pipeline ─────────────────────────────────────────────────
    let result = generate_with_progress(&request, &session, &config, progress_cb.as_ref()).await;

    let output = match result {
        Ok(output) => output,
        Err(e) => {
            eprintln!("{} failed during {}: {}", red("✘"), bold(&e.stage().to_string()), e);
            std::process::exit(1);
        }
    };

    // ── Print / write results ────────────────────────────────────────────
    if let Some(ref output_path) = cli.output {
        write_markdown(output_path, &output.markdown)
            .await
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        if !cli.quiet {
            eprintln!(
                "{}  {} image links  {}ms  →  {}",
                green("✔"),
                output.stats.image_links,
                output.stats.total_duration_ms,
                bold(&output_path.display().to_string()),
            );
        }
    } else if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(output.markdown.as_bytes())
            .context("Failed to write to stdout")?;
        // Ensure a trailing newline on stdout.
        if !output.markdown.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
        if !cli.quiet && !show_progress {
            eprintln!(
                "Generated {} chars with {} image links in {}ms",
                output.stats.article_chars,
                output.stats.image_links,
                output.stats.total_duration_ms
            );
        }
    }

    Ok(())
}

/// Map CLI args to `GenerationConfig`.
fn build_config(cli: &Cli) -> Result<GenerationConfig> {
    let mut builder = GenerationConfig::builder()
        .article_max_tokens(cli.max_tokens)
        .temperature(cli.temperature)
        .fetch_timeout_secs(cli.fetch_timeout)
        .api_timeout_secs(cli.api_timeout);

    if let Some(ref model) = cli.article_model {
        builder = builder.article_model(model);
    }
    if let Some(ref model) = cli.prompt_model {
        builder = builder.prompt_model(model);
    }
    if let Some(ref model) = cli.image_model {
        builder = builder.image_model(model);
    }
    if let Some(ref size) = cli.image_size {
        builder = builder.image_size(size);
    }

    Ok(builder.build()?)
}
