//! Inkprint Capture
//!
//! Takes full-page screenshots of a list of URLs through a screenshot API,
//! rotating through a pool of API keys as they run out of quota.
//!
//! # Architecture
//!
//! ```text
//! URLs → ScreenshotAcquirer ──(key from CredentialPool)──→ ScreenshotFetcher
//!          │ 200: write <host>_<path>.png
//!          │ quota status / transport error: next key, same URL
//!          │ other status: skip URL
//!          └→ CaptureSession: run dir + screenshots.zip + in-process repeat cache
//! ```
//!
//! # Example Usage
//!
//! ```
//! use inkprint_capture::{CaptureConfig, CaptureOutcome, CaptureSession, CredentialPool, MockFetcher};
//!
//! let cache = tempfile::tempdir().unwrap();
//! let fetcher = MockFetcher::new(200);
//! let mut session = CaptureSession::new(fetcher, &CaptureConfig::default(), cache.path());
//! let mut pool = CredentialPool::from_comma_separated("key-1,key-2");
//!
//! match session.capture(&["https://example.com/thread/1"], &mut pool).unwrap() {
//!     CaptureOutcome::Captured(report) => assert_eq!(report.images.len(), 1),
//!     CaptureOutcome::NothingCaptured { .. } => unreachable!(),
//! }
//! ```

#![warn(missing_docs)]

mod acquirer;
mod archive;
mod config;
mod credentials;
mod error;
mod fetcher;
mod filename;
mod mock;
mod session;

pub use acquirer::{SavedImage, ScreenshotAcquirer};
pub use archive::{write_archive, ARCHIVE_NAME};
pub use config::CaptureConfig;
pub use credentials::{ApiKey, CredentialPool};
pub use error::CaptureError;
pub use fetcher::{FetchResponse, ScreenshotFetcher, ScreenshotMachineClient};
pub use filename::filename_for_url;
pub use mock::MockFetcher;
pub use session::{CaptureOutcome, CaptureReport, CaptureSession, RunId};
