//! Progress-callback trait for per-stage generation events.
//!
//! Pass an [`Arc<dyn RunProgressCallback>`] to
//! [`crate::generate_with_progress`] to receive real-time events as the
//! pipeline moves through its stages.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a Tokio broadcast channel, a WebSocket, a database record,
//! or a terminal progress bar — without the library knowing anything about how
//! the host application communicates. The trait is `Send + Sync` so it can be
//! shared with background tasks.
//!
//! # Example
//!
//! ```rust
//! use url2article::{RunProgressCallback, Stage};
//!
//! struct LoggingCallback;
//!
//! impl RunProgressCallback for LoggingCallback {
//!     fn on_stage_start(&self, stage: Stage) {
//!         eprintln!("starting {stage}...");
//!     }
//!     fn on_stage_complete(&self, stage: Stage, elapsed_ms: u64) {
//!         eprintln!("{stage} done in {elapsed_ms}ms");
//!     }
//! }
//! ```

use std::sync::Arc;

use crate::error::Stage;

/// Called by the generation pipeline as it moves through its stages.
///
/// Implementations must be `Send + Sync`. All methods have default no-op
/// implementations so callers only override what they care about.
pub trait RunProgressCallback: Send + Sync {
    /// Called once before the first stage runs.
    fn on_run_start(&self, keyword: &str) {
        let _ = keyword;
    }

    /// Called just before a stage begins.
    fn on_stage_start(&self, stage: Stage) {
        let _ = stage;
    }

    /// Called when a stage finishes successfully.
    ///
    /// # Arguments
    /// * `stage`      — the stage that completed
    /// * `elapsed_ms` — wall-clock milliseconds the stage took
    fn on_stage_complete(&self, stage: Stage, elapsed_ms: u64) {
        let _ = (stage, elapsed_ms);
    }

    /// Called within a stage for per-item work (sources fetched, prompts
    /// drafted, images synthesized). `item` is 1-indexed.
    fn on_item_complete(&self, stage: Stage, item: usize, total: usize) {
        let _ = (stage, item, total);
    }

    /// Called when a stage fails. The run stops here; no later stage starts.
    fn on_stage_error(&self, stage: Stage, error: &str) {
        let _ = (stage, error);
    }

    /// Called once after the final stage, only on success.
    fn on_run_complete(&self, total_ms: u64, markdown_len: usize) {
        let _ = (total_ms, markdown_len);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl RunProgressCallback for NoopProgressCallback {}

/// Convenience alias for the shared callback handle.
pub type ProgressCallback = Arc<dyn RunProgressCallback>;
