//! Keyword extraction and website ideation over extracted text

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::normalizer::normalize;
use crate::prompt::{keyword_prompt, website_system_prompt, website_user_prompt};
use inkprint_domain::{LlmProvider, TextCompletionRequest};
use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;
use tracing::{debug, info};

/// Keywords for an article, plus optional search sites
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeywordReport {
    /// Distinctive terms, in model order
    pub keywords: Vec<String>,

    /// Suggested `site:` filters, when ideation was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sites: Option<Vec<String>>,
}

/// Finds stylistic fingerprints in a text and where to search for them
pub struct KeywordAnalyzer<P> {
    provider: P,
    config: ExtractorConfig,
}

impl<P> KeywordAnalyzer<P>
where
    P: LlmProvider,
    P::Error: Display,
{
    /// Create a new analyzer
    pub fn new(provider: P, config: ExtractorConfig) -> Self {
        Self { provider, config }
    }

    /// Ask for `count` keywords describing the author's writing in `article`
    ///
    /// # Errors
    ///
    /// - `Validation` when the text has no word characters or `count` is
    ///   outside `1..=max_keyword_count`; no model call is made
    /// - `Llm` on transport failure
    /// - `MalformedResponse` when the reply has no keyword list
    pub fn extract_keywords(&self, article: &str, count: usize) -> Result<Vec<String>, ExtractorError> {
        require_text(article)?;
        if count == 0 || count > self.config.max_keyword_count {
            return Err(ExtractorError::Validation(format!(
                "keyword count must be between 1 and {}",
                self.config.max_keyword_count
            )));
        }

        let request = TextCompletionRequest::new(keyword_prompt(count), article);
        let keywords = self.ask_for_list(&request, "keywords")?;
        info!("Extracted {} keyword(s)", keywords.len());
        Ok(keywords)
    }

    /// Suggest sites where `keywords` are likely to find more of the author
    pub fn ideate_websites(&self, article: &str, keywords: &[String]) -> Result<Vec<String>, ExtractorError> {
        require_text(article)?;

        let request = TextCompletionRequest::new(
            website_system_prompt(),
            website_user_prompt(article, keywords),
        );
        let sites = self.ask_for_list(&request, "sites")?;
        info!("Suggested {} site(s)", sites.len());
        Ok(sites)
    }

    /// Keywords, then sites when `ideate` is set
    pub fn analyze(&self, article: &str, count: usize, ideate: bool) -> Result<KeywordReport, ExtractorError> {
        let keywords = self.extract_keywords(article, count)?;
        let sites = if ideate {
            Some(self.ideate_websites(article, &keywords)?)
        } else {
            None
        };
        Ok(KeywordReport { keywords, sites })
    }

    fn ask_for_list(&self, request: &TextCompletionRequest, field: &str) -> Result<Vec<String>, ExtractorError> {
        let response = self
            .provider
            .complete_text(request)
            .map_err(|e| ExtractorError::Llm(e.to_string()))?;
        debug!("Raw {} response: {}", field, response);

        let value = normalize(&response)?;
        string_list(&value, field).ok_or_else(|| {
            ExtractorError::MalformedResponse(format!("expected a '{}' list, got: {}", field, value))
        })
    }
}

/// Text must contain at least one word character
fn require_text(article: &str) -> Result<(), ExtractorError> {
    if article.chars().any(|c| c.is_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(ExtractorError::Validation(
            "text contains no words to analyze".to_string(),
        ))
    }
}

/// Accept `{"<field>": [...]}` or a bare array; keep non-blank strings
fn string_list(value: &Value, field: &str) -> Option<Vec<String>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) => map.get(field)?.as_array()?,
        _ => return None,
    };

    Some(
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    )
}
