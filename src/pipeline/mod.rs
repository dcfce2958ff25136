//! Pipeline stages for URL-to-article generation.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets us swap
//! implementations (e.g. a different extraction strategy) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! extract ──▶ draft ──▶ prompt ──▶ illustrate ──▶ compose
//! (3 URLs)   (article)  (3 texts)  (3 URLs)       (final Markdown)
//! ```
//!
//! 1. [`extract`]    — fetch each source URL and pull out its paragraph text
//! 2. [`draft`]      — one text-generation call producing the Markdown
//!    article with three image placeholders
//! 3. [`prompt`]     — three serial text-generation calls producing one
//!    image prompt each, from a fixed prefix of the draft
//! 4. [`illustrate`] — three serial image-synthesis calls, one URL each
//! 5. [`compose`]    — literal positional substitution of the placeholders
//!    with Markdown image links
//!
//! Stages run strictly in order and each is gated on the previous: the first
//! failure ends the run with no partial output.

pub mod compose;
pub mod draft;
pub mod extract;
pub mod illustrate;
pub mod prompt;
