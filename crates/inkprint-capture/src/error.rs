//! Error types for screenshot capture

use thiserror::Error;

/// Errors that can occur while capturing screenshots
///
/// Per-URL HTTP failures are handled by the acquirer (key rotation or URL
/// abandonment); they only surface as `Http` from a fetcher.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Input rejected before any request
    #[error("Validation error: {0}")]
    Validation(String),

    /// Writing screenshots or the run directory failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Packaging the archive failed
    #[error("Archive error: {0}")]
    Archive(String),

    /// Transport failure talking to the screenshot API
    #[error("HTTP error: {0}")]
    Http(String),
}

impl From<zip::result::ZipError> for CaptureError {
    fn from(e: zip::result::ZipError) -> Self {
        CaptureError::Archive(e.to_string())
    }
}

impl From<reqwest::Error> for CaptureError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() {
            CaptureError::Http(format!("connection failed: {}", e))
        } else if e.is_timeout() {
            CaptureError::Http("request timed out".to_string())
        } else {
            CaptureError::Http(e.to_string())
        }
    }
}
