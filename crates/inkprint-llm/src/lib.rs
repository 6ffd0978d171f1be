//! Inkprint LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `inkprint-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic, scripted mock for testing
//! - `AzureOpenAiProvider`: Azure OpenAI chat-completions deployment
//!
//! # Examples
//!
//! ```
//! use inkprint_llm::MockProvider;
//! use inkprint_domain::{EncodedImage, LlmProvider};
//!
//! let provider = MockProvider::new("no");
//! let image = EncodedImage::new("aGVsbG8=");
//! let result = provider.complete_vision("Is alice the author?", &image).unwrap();
//! assert_eq!(result, "no");
//! ```

#![warn(missing_docs)]

pub mod azure;

use inkprint_domain::{EncodedImage, LlmProvider, TextCompletionRequest};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

pub use azure::{AzureOpenAiConfig, AzureOpenAiProvider};

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Kind of completion a recorded call was
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// Prompt plus one image
    Vision,
    /// System + user text
    Text,
}

/// A call observed by [`MockProvider`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Vision or text
    pub kind: CallKind,
    /// Prompt (vision) or system prompt (text)
    pub prompt: String,
    /// Image payload for vision calls, user content for text calls
    pub payload: String,
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error(String),
}

#[derive(Debug, Default)]
struct MockState {
    queued: VecDeque<MockReply>,
    by_prompt_and_payload: HashMap<(String, String), MockReply>,
    by_prompt: HashMap<String, MockReply>,
    calls: Vec<RecordedCall>,
}

/// Mock LLM provider for deterministic testing
///
/// No network calls are made. Replies are resolved in this order:
/// 1. queued replies (FIFO), one per call
/// 2. a reply registered for the exact `(prompt, payload)` pair
/// 3. a reply registered for the exact prompt
/// 4. the default response
///
/// Clones share state, so a test can keep a handle for call assertions after
/// moving the provider into the code under test.
///
/// # Examples
///
/// ```
/// use inkprint_llm::MockProvider;
/// use inkprint_domain::{EncodedImage, LlmProvider};
///
/// let provider = MockProvider::default();
/// provider.add_response("verify", "yes");
/// provider.add_vision_response("extract", "img-2", r#"{"content": ["hi"]}"#);
///
/// let img1 = EncodedImage::new("img-1");
/// let img2 = EncodedImage::new("img-2");
/// assert_eq!(provider.complete_vision("verify", &img1).unwrap(), "yes");
/// assert_eq!(provider.complete_vision("extract", &img2).unwrap(), r#"{"content": ["hi"]}"#);
/// assert_eq!(provider.call_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&self, prompt: impl Into<String>, response: impl Into<String>) {
        self.state()
            .by_prompt
            .insert(prompt.into(), MockReply::Text(response.into()));
    }

    /// Add a response for a prompt asked about one particular payload
    ///
    /// For vision calls the payload is the base64 image, for text calls it is
    /// the user content.
    pub fn add_vision_response(
        &self,
        prompt: impl Into<String>,
        payload: impl Into<String>,
        response: impl Into<String>,
    ) {
        self.state()
            .by_prompt_and_payload
            .insert((prompt.into(), payload.into()), MockReply::Text(response.into()));
    }

    /// Configure to return an error for a specific prompt
    pub fn add_error(&self, prompt: impl Into<String>) {
        self.state()
            .by_prompt
            .insert(prompt.into(), MockReply::Error("Mock error".to_string()));
    }

    /// Configure to return an error for a prompt asked about one payload
    pub fn add_payload_error(&self, prompt: impl Into<String>, payload: impl Into<String>) {
        self.state().by_prompt_and_payload.insert(
            (prompt.into(), payload.into()),
            MockReply::Error("Mock error".to_string()),
        );
    }

    /// Queue a reply for the next unanswered call
    pub fn queue_response(&self, response: impl Into<String>) {
        self.state().queued.push_back(MockReply::Text(response.into()));
    }

    /// Queue an error for the next unanswered call
    pub fn queue_error(&self, message: impl Into<String>) {
        self.state().queued.push_back(MockReply::Error(message.into()));
    }

    /// Get the number of times the provider was called
    pub fn call_count(&self) -> usize {
        self.state().calls.len()
    }

    /// Number of calls whose prompt was exactly `prompt`
    pub fn calls_with_prompt(&self, prompt: &str) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|call| call.prompt == prompt)
            .count()
    }

    /// All recorded calls, oldest first
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state().calls.clone()
    }

    /// Reset the call history
    pub fn reset_call_count(&self) {
        self.state().calls.clear();
    }

    fn respond(&self, kind: CallKind, prompt: &str, payload: &str) -> Result<String, LlmError> {
        let mut state = self.state();
        state.calls.push(RecordedCall {
            kind,
            prompt: prompt.to_string(),
            payload: payload.to_string(),
        });

        let reply = state
            .queued
            .pop_front()
            .or_else(|| {
                state
                    .by_prompt_and_payload
                    .get(&(prompt.to_string(), payload.to_string()))
                    .cloned()
            })
            .or_else(|| state.by_prompt.get(prompt).cloned())
            .unwrap_or_else(|| MockReply::Text(self.default_response.clone()));

        match reply {
            MockReply::Text(text) => Ok(text),
            MockReply::Error(message) => Err(LlmError::Other(message)),
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProvider for MockProvider {
    type Error = LlmError;

    fn complete_vision(&self, prompt: &str, image: &EncodedImage) -> Result<String, Self::Error> {
        self.respond(CallKind::Vision, prompt, image.as_str())
    }

    fn complete_text(&self, request: &TextCompletionRequest) -> Result<String, Self::Error> {
        self.respond(CallKind::Text, &request.system_prompt, &request.user_content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(payload: &str) -> EncodedImage {
        EncodedImage::new(payload)
    }

    #[test]
    fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.complete_vision("any prompt", &image("x"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "Test response");
    }

    #[test]
    fn test_mock_provider_specific_responses() {
        let provider = MockProvider::default();
        provider.add_response("hello", "world");
        provider.add_response("foo", "bar");

        assert_eq!(provider.complete_vision("hello", &image("x")).unwrap(), "world");
        assert_eq!(provider.complete_vision("foo", &image("x")).unwrap(), "bar");
        assert_eq!(
            provider.complete_vision("unknown", &image("x")).unwrap(),
            "Default mock response"
        );
    }

    #[test]
    fn test_payload_specific_response_wins_over_prompt() {
        let provider = MockProvider::default();
        provider.add_response("verify", "no");
        provider.add_vision_response("verify", "img-1", "yes");

        assert_eq!(provider.complete_vision("verify", &image("img-1")).unwrap(), "yes");
        assert_eq!(provider.complete_vision("verify", &image("img-2")).unwrap(), "no");
    }

    #[test]
    fn test_queued_responses_come_first() {
        let provider = MockProvider::new("default");
        provider.add_response("p", "registered");
        provider.queue_response("first");
        provider.queue_error("boom");

        assert_eq!(provider.complete_vision("p", &image("x")).unwrap(), "first");
        assert!(provider.complete_vision("p", &image("x")).is_err());
        assert_eq!(provider.complete_vision("p", &image("x")).unwrap(), "registered");
    }

    #[test]
    fn test_mock_provider_call_count() {
        let provider = MockProvider::new("test");

        assert_eq!(provider.call_count(), 0);

        provider.complete_vision("prompt1", &image("x")).unwrap();
        assert_eq!(provider.call_count(), 1);

        provider
            .complete_text(&TextCompletionRequest::new("system", "user"))
            .unwrap();
        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.calls_with_prompt("system"), 1);
        assert_eq!(provider.calls()[1].kind, CallKind::Text);
        assert_eq!(provider.calls()[1].payload, "user");

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_mock_provider_error() {
        let provider = MockProvider::default();
        provider.add_error("bad prompt");

        let result = provider.complete_vision("bad prompt", &image("x"));
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), LlmError::Other(_)));
    }

    #[test]
    fn test_mock_provider_clone() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.complete_vision("test", &image("x")).unwrap();

        // Both should share the same call history due to Arc
        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }

    fn ask<P: LlmProvider>(provider: P) -> Result<String, P::Error> {
        provider.complete_vision("p", &image("x"))
    }

    #[test]
    fn test_provider_by_reference() {
        let provider = MockProvider::new("via ref");
        assert_eq!(ask(&provider).unwrap(), "via ref");
        assert_eq!(provider.call_count(), 1);
    }
}
