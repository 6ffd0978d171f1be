//! Trait definitions for external interactions
//!
//! These traits define the boundary between the extraction pipeline and the
//! model transport. Implementations live in `inkprint-llm`.

use crate::EncodedImage;

/// Requested shape of a text completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    /// Ask the model for a single JSON object
    #[default]
    JsonObject,
    /// Free-form text
    Text,
}

impl ResponseFormat {
    /// Wire name used by chat-completion APIs
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseFormat::JsonObject => "json_object",
            ResponseFormat::Text => "text",
        }
    }
}

/// A system + user text completion with sampling settings
///
/// Defaults are deterministic (temperature 0) so keyword and website
/// suggestions are reproducible for the same input.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCompletionRequest {
    /// System instructions
    pub system_prompt: String,
    /// User message body
    pub user_content: String,
    /// Requested response format
    pub response_format: ResponseFormat,
    /// Sampling temperature
    pub temperature: f32,
    /// Nucleus sampling mass
    pub top_p: f32,
    /// Frequency penalty
    pub frequency_penalty: f32,
    /// Presence penalty
    pub presence_penalty: f32,
    /// Optional stop sequences
    pub stop: Option<Vec<String>>,
}

impl TextCompletionRequest {
    /// Create a request with the deterministic defaults
    ///
    /// # Examples
    ///
    /// ```
    /// use inkprint_domain::{ResponseFormat, TextCompletionRequest};
    ///
    /// let request = TextCompletionRequest::new("system", "user");
    /// assert_eq!(request.temperature, 0.0);
    /// assert_eq!(request.top_p, 0.95);
    /// assert_eq!(request.response_format, ResponseFormat::JsonObject);
    /// ```
    pub fn new(system_prompt: impl Into<String>, user_content: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_content: user_content.into(),
            response_format: ResponseFormat::JsonObject,
            temperature: 0.0,
            top_p: 0.95,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            stop: None,
        }
    }

    /// Override the response format
    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = format;
        self
    }
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (inkprint-llm). Calls block until
/// the model answers or the transport fails.
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Answer a prompt about exactly one image
    fn complete_vision(&self, prompt: &str, image: &EncodedImage) -> Result<String, Self::Error>;

    /// Text-only completion
    fn complete_text(&self, request: &TextCompletionRequest) -> Result<String, Self::Error>;
}

impl<P: LlmProvider + ?Sized> LlmProvider for &P {
    type Error = P::Error;

    fn complete_vision(&self, prompt: &str, image: &EncodedImage) -> Result<String, Self::Error> {
        (**self).complete_vision(prompt, image)
    }

    fn complete_text(&self, request: &TextCompletionRequest) -> Result<String, Self::Error> {
        (**self).complete_text(request)
    }
}
