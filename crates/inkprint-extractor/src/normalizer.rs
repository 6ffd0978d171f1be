//! Normalize raw model output into JSON

use crate::error::ExtractorError;
use serde_json::Value;

/// Parse a model response as JSON, tolerating a markdown code fence
///
/// The response is parsed as-is first. If that fails, a leading fence line
/// (```` ``` ```` or ```` ```json ````) and a trailing ```` ``` ```` are removed and
/// the remainder is parsed again.
///
/// # Errors
///
/// Returns `ExtractorError::MalformedResponse` when the second parse fails.
///
/// # Examples
///
/// ```
/// use inkprint_extractor::normalize;
/// use serde_json::json;
///
/// let value = normalize("```json\n{\"content\": []}\n```").unwrap();
/// assert_eq!(value, json!({"content": []}));
/// assert!(normalize("not json").is_err());
/// ```
pub fn normalize(raw: &str) -> Result<Value, ExtractorError> {
    if let Ok(value) = serde_json::from_str(raw) {
        return Ok(value);
    }

    let stripped = strip_code_fence(raw);
    serde_json::from_str(stripped)
        .map_err(|e| ExtractorError::MalformedResponse(format!("JSON parse error: {}", e)))
}

/// Remove a surrounding markdown code fence, if any
fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();

    let body = match trimmed.strip_prefix("```") {
        Some(rest) => {
            let rest = rest.strip_prefix("json").unwrap_or(rest);
            // Anything else on the opening line is a language tag we don't know
            match rest.split_once('\n') {
                Some((tag, after)) if !tag.trim().is_empty() && !tag.trim_start().starts_with(['{', '[']) => after,
                _ => rest,
            }
        }
        None => trimmed,
    };

    body.trim().strip_suffix("```").unwrap_or(body).trim()
}
