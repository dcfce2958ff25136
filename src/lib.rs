//! # url2article
//!
//! Draft an illustrated Markdown article from three source URLs, a keyword,
//! a target audience, and a tone of voice.
//!
//! ## Why this crate?
//!
//! Researching a topic, drafting keyword-focused copy, and sourcing images
//! are three separate chores. This crate chains them: it reads the paragraph
//! text of three reference pages, asks a text model for a full article with
//! positional image placeholders, asks for one image prompt per placeholder,
//! synthesizes the images, and splices the resulting URLs back into the
//! draft — producing one ready-to-publish Markdown document.
//!
//! ## Pipeline Overview
//!
//! ```text
//! 3 URLs + keyword + audience + tone
//!  │
//!  ├─ 1. Extract     fetch each URL, keep its <p> text (serial, fail-fast)
//!  ├─ 2. Draft       one text-model call → Markdown with 3 placeholders
//!  ├─ 3. Prompt      three text-model calls → one image prompt each
//!  ├─ 4. Illustrate  three image-model calls → one hosted URL each
//!  └─ 5. Compose     placeholder N → ![Image N](url N), literally
//! ```
//!
//! Every stage gates the next: a failure anywhere stops the run before the
//! following stage issues a single call. There are no retries.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use url2article::{generate, ArticleRequest, Credentials, GenerationConfig, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GenerationConfig::default();
//!     let credentials = Credentials::new(
//!         std::env::var("ANTHROPIC_API_KEY")?,
//!         std::env::var("OPENAI_API_KEY")?,
//!     );
//!     let session = Session::new(&credentials, &config)?;
//!
//!     let request = ArticleRequest::new(
//!         [
//!             "https://example.com/a".into(),
//!             "https://example.com/b".into(),
//!             "https://example.com/c".into(),
//!         ],
//!         "rust async runtimes",
//!         "backend engineers",
//!         "practical and direct",
//!     );
//!
//!     let output = generate(&request, &session, &config).await?;
//!     println!("{}", output.markdown);
//!     eprintln!("{} image links, {}ms total",
//!         output.stats.image_links,
//!         output.stats.total_duration_ms);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `url2article` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! url2article = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod generate;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod providers;
pub mod session;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{GenerationConfig, GenerationConfigBuilder, IMAGE_SLOTS};
pub use error::{ArticleGenError, Stage};
pub use generate::{
    generate, generate_sync, generate_to_file, generate_with_progress, write_markdown,
    ArticleRequest,
};
pub use output::{ArticleOutput, RunStats};
pub use progress::{NoopProgressCallback, ProgressCallback, RunProgressCallback};
pub use session::{Credentials, Session};
