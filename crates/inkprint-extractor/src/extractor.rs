//! Extraction stage: the author's verbatim content from one image

use crate::normalizer::normalize;
use crate::prompt::PromptBuilder;
use inkprint_domain::{EncodedImage, ExtractionResult, LlmProvider};
use serde_json::Value;
use tracing::{debug, warn};

/// Asks the model for the content attributed to an author in one image
///
/// Only meant to run after a `Present` verdict: the extraction prompt is the
/// expensive one.
pub struct AuthorExtractor<P> {
    provider: P,
}

impl<P> AuthorExtractor<P>
where
    P: LlmProvider,
    P::Error: std::fmt::Display,
{
    /// Create a new extractor
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Extract the author's content
    ///
    /// Never fails: transport errors, malformed JSON and JSON of the wrong
    /// shape all degrade to an empty result.
    pub fn extract(&self, author: &str, image: &EncodedImage) -> ExtractionResult {
        let prompt = PromptBuilder::new(author).extraction();

        let response = match self.provider.complete_vision(&prompt, image) {
            Ok(response) => response,
            Err(e) => {
                warn!("Extraction call failed, using empty content: {}", e);
                return ExtractionResult::empty();
            }
        };

        match normalize(&response) {
            Ok(value) => {
                let result = parse_content(&value);
                debug!("Extracted {} fragment(s)", result.content.len());
                result
            }
            Err(e) => {
                warn!("Extraction response unusable, using empty content: {}", e);
                ExtractionResult::empty()
            }
        }
    }
}

/// Read `{"content": [...]}` into an `ExtractionResult`
///
/// Anything other than an object with a `content` array yields an empty
/// result. `null` entries are kept as `None`; non-string scalars and nested
/// values are kept in their JSON text form.
pub(crate) fn parse_content(value: &Value) -> ExtractionResult {
    let Some(items) = value.get("content").and_then(Value::as_array) else {
        return ExtractionResult::empty();
    };

    let content = items
        .iter()
        .map(|item| match item {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
        .collect();

    ExtractionResult { content }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkprint_llm::MockProvider;
    use serde_json::json;

    fn image() -> EncodedImage {
        EncodedImage::new("aW1n")
    }

    #[test]
    fn test_extracts_content_array() {
        let extractor = AuthorExtractor::new(MockProvider::new(
            r#"{"content": ["first post", "second post"]}"#,
        ));
        let result = extractor.extract("alice", &image());
        assert_eq!(result, ExtractionResult::from_strings(["first post", "second post"]));
    }

    #[test]
    fn test_fenced_response() {
        let extractor = AuthorExtractor::new(MockProvider::new(
            "```json\n{\"content\": [\"hello\"]}\n```",
        ));
        assert_eq!(
            extractor.extract("alice", &image()),
            ExtractionResult::from_strings(["hello"])
        );
    }

    #[test]
    fn test_malformed_response_degrades_to_empty() {
        let extractor = AuthorExtractor::new(MockProvider::new("Sorry, I can't read that."));
        assert!(extractor.extract("alice", &image()).is_empty());
    }

    #[test]
    fn test_transport_error_degrades_to_empty() {
        let provider = MockProvider::default();
        provider.queue_error("timeout");
        let extractor = AuthorExtractor::new(provider);
        assert!(extractor.extract("alice", &image()).is_empty());
    }

    #[test]
    fn test_wrong_shape_degrades_to_empty() {
        assert!(parse_content(&json!(["a", "b"])).is_empty());
        assert!(parse_content(&json!({"posts": ["a"]})).is_empty());
        assert!(parse_content(&json!({"content": "a"})).is_empty());
    }

    #[test]
    fn test_null_and_scalar_entries() {
        let result = parse_content(&json!({"content": ["a", null, 42]}));
        assert_eq!(
            result.content,
            vec![Some("a".to_string()), None, Some("42".to_string())]
        );
    }
}
