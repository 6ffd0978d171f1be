//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur during extraction
///
/// Only validation and input errors normally reach callers of the batch
/// pipeline; per-image model failures are degraded or reported as progress.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Model output was not valid JSON, even after removing a code fence
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Input rejected before any model call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Reading an input file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Reading a zip archive of screenshots failed
    #[error("Archive error: {0}")]
    Archive(String),
}

impl From<zip::result::ZipError> for ExtractorError {
    fn from(e: zip::result::ZipError) -> Self {
        ExtractorError::Archive(e.to_string())
    }
}
