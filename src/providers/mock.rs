//! Deterministic providers for tests.
//!
//! Each mock serves a scripted queue of responses and counts how many calls
//! it received, which is what the pipeline gating tests need: "no generation
//! call observed after a failed stage" is an assertion on these counters.

use super::{ImageGenerator, ProviderError, TextGenerator};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Scripted [`TextGenerator`]: pops one response per call, in order.
///
/// An exhausted queue returns a `ProviderError::Request` rather than
/// panicking, so over-calling shows up as a test failure with context.
pub struct MockTextGenerator {
    responses: Mutex<VecDeque<Result<String, String>>>,
    calls: AtomicUsize,
}

impl MockTextGenerator {
    /// Serve these results, one per call. `Err` entries become
    /// [`ProviderError::Request`] with the given message.
    pub fn with_responses(responses: Vec<Result<String, String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail every call with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            responses: Mutex::new(VecDeque::from([Err(message)])),
            calls: AtomicUsize::new(0),
        }
    }

    /// How many completion calls this mock has received.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next(&self) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(ProviderError::Request(message)),
            None => Err(ProviderError::Request("mock response queue exhausted".into())),
        }
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn complete(
        &self,
        _system_role: &str,
        _user_prompt: &str,
        _max_tokens: u32,
        _temperature: f32,
    ) -> Result<String, ProviderError> {
        self.next().map(|s| s.trim().to_string())
    }
}

/// Scripted [`ImageGenerator`]: pops one URL per call, in order.
pub struct MockImageGenerator {
    urls: Mutex<VecDeque<Result<String, String>>>,
    calls: AtomicUsize,
}

impl MockImageGenerator {
    /// Serve these URL results, one per call.
    pub fn with_urls(urls: Vec<Result<String, String>>) -> Self {
        Self {
            urls: Mutex::new(urls.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail every call with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            urls: Mutex::new(VecDeque::from([Err(message)])),
            calls: AtomicUsize::new(0),
        }
    }

    /// How many synthesis calls this mock has received.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageGenerator for MockImageGenerator {
    async fn synthesize(&self, _prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.urls.lock().unwrap().pop_front() {
            Some(Ok(url)) => Ok(url),
            Some(Err(message)) => Err(ProviderError::Request(message)),
            None => Err(ProviderError::Request("mock URL queue exhausted".into())),
        }
    }
}
