//! Verification stage: is the author credited in an image?

use crate::error::ExtractorError;
use crate::prompt::PromptBuilder;
use inkprint_domain::{AuthorshipVerdict, EncodedImage, LlmProvider};
use tracing::debug;

/// Asks the model a strict yes/no authorship question about one image
pub struct AuthorVerifier<P> {
    provider: P,
}

impl<P> AuthorVerifier<P>
where
    P: LlmProvider,
    P::Error: std::fmt::Display,
{
    /// Create a new verifier
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Verify authorship presence
    ///
    /// Only an answer of exactly "yes" (after trimming and lower-casing) is
    /// `Present`. There is no retry.
    ///
    /// # Errors
    ///
    /// Transport failures are returned as `ExtractorError::Llm`, never folded
    /// into `Absent`.
    pub fn verify(
        &self,
        author: &str,
        image: &EncodedImage,
    ) -> Result<AuthorshipVerdict, ExtractorError> {
        let prompt = PromptBuilder::new(author).verification();
        let response = self
            .provider
            .complete_vision(&prompt, image)
            .map_err(|e| ExtractorError::Llm(e.to_string()))?;

        let verdict = AuthorshipVerdict::from_response(&response);
        debug!("Verification answer {:?} -> {:?}", response.trim(), verdict);
        Ok(verdict)
    }
}
