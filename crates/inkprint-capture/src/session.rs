//! Capture runs with per-run directories and a repeat-request cache

use crate::acquirer::{SavedImage, ScreenshotAcquirer};
use crate::archive::write_archive;
use crate::config::CaptureConfig;
use crate::credentials::CredentialPool;
use crate::error::CaptureError;
use crate::fetcher::ScreenshotFetcher;
use std::path::PathBuf;
use tracing::{debug, info};
use uuid::Uuid;

/// Identifier of one capture run
pub type RunId = Uuid;

/// A run that captured at least one screenshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureReport {
    /// Run identifier, also the run directory name
    pub run_id: RunId,
    /// Directory holding this run's files
    pub run_dir: PathBuf,
    /// Captured screenshots, in URL order
    pub images: Vec<SavedImage>,
    /// `screenshots.zip` inside `run_dir`
    pub archive_path: PathBuf,
    /// True when the run stopped early because every key was used up
    pub exhausted: bool,
}

/// Result of one capture request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Nothing was captured; no archive was written
    NothingCaptured {
        /// The (empty) run directory
        run_dir: PathBuf,
        /// True when the key pool ran out
        exhausted: bool,
    },
    /// At least one screenshot, possibly fewer than requested
    Captured(CaptureReport),
}

impl CaptureOutcome {
    /// The report, if anything was captured
    pub fn report(&self) -> Option<&CaptureReport> {
        match self {
            CaptureOutcome::Captured(report) => Some(report),
            CaptureOutcome::NothingCaptured { .. } => None,
        }
    }
}

/// Runs captures under `<cache_root>/screenshots/<run id>/`
///
/// Requesting the exact same URL list as the last successful run returns
/// that run's report without any new request. The remembered run lives in
/// the session value only: it is not persisted, so separate `inkprint`
/// invocations never share it.
pub struct CaptureSession<F> {
    acquirer: ScreenshotAcquirer<F>,
    cache_root: PathBuf,
    last: Option<(Vec<String>, CaptureReport)>,
}

impl<F: ScreenshotFetcher> CaptureSession<F> {
    /// Create a session storing runs under `cache_root`
    pub fn new(fetcher: F, config: &CaptureConfig, cache_root: impl Into<PathBuf>) -> Self {
        Self {
            acquirer: ScreenshotAcquirer::new(fetcher, config.clone()),
            cache_root: cache_root.into(),
            last: None,
        }
    }

    /// Directory holding all run directories
    pub fn screenshots_root(&self) -> PathBuf {
        self.cache_root.join("screenshots")
    }

    /// Capture `urls`, or reuse the previous report for the same list
    ///
    /// URLs are trimmed and blank ones dropped before comparison.
    pub fn capture<S: AsRef<str>>(
        &mut self,
        urls: &[S],
        pool: &mut CredentialPool,
    ) -> Result<CaptureOutcome, CaptureError> {
        let urls: Vec<String> = urls
            .iter()
            .map(|u| u.as_ref().trim().to_string())
            .filter(|u| !u.is_empty())
            .collect();

        if let Some((last_urls, report)) = &self.last {
            if *last_urls == urls {
                debug!("Reusing capture run {}", report.run_id);
                return Ok(CaptureOutcome::Captured(report.clone()));
            }
        }

        let run_id = RunId::now_v7();
        let run_dir = self.screenshots_root().join(run_id.to_string());
        info!("Capturing {} URL(s) into {}", urls.len(), run_dir.display());

        let images = self.acquirer.acquire(&urls, pool, &run_dir)?;
        let exhausted = pool.is_exhausted();

        if images.is_empty() {
            info!("No screenshots captured");
            return Ok(CaptureOutcome::NothingCaptured { run_dir, exhausted });
        }

        let archive_path = write_archive(&images, &run_dir)?;
        info!("{} screenshot(s) captured", images.len());

        let report = CaptureReport {
            run_id,
            run_dir,
            images,
            archive_path,
            exhausted,
        };
        self.last = Some((urls, report.clone()));
        Ok(CaptureOutcome::Captured(report))
    }

    /// Forget the cached run so the next capture always hits the API
    pub fn invalidate(&mut self) {
        self.last = None;
    }
}
