//! URL-by-URL screenshot acquisition with key rotation

use crate::config::CaptureConfig;
use crate::credentials::CredentialPool;
use crate::error::CaptureError;
use crate::fetcher::ScreenshotFetcher;
use crate::filename::filename_for_url;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A screenshot written to disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedImage {
    /// URL that was captured
    pub url: String,
    /// Where the PNG was written
    pub path: PathBuf,
}

impl SavedImage {
    /// Base file name of the saved PNG
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Captures URLs one at a time, rotating keys on quota failures
pub struct ScreenshotAcquirer<F> {
    fetcher: F,
    config: CaptureConfig,
}

impl<F: ScreenshotFetcher> ScreenshotAcquirer<F> {
    /// Create an acquirer; `config` decides which statuses mean "next key"
    pub fn new(fetcher: F, config: CaptureConfig) -> Self {
        Self { fetcher, config }
    }

    /// Capture `urls` into `output_dir`
    ///
    /// Per URL, starting from the pool's current key:
    /// - 200: write the PNG, move to the next URL with the same key
    /// - quota status or transport error: advance the pool, retry the URL
    /// - any other status: abandon the URL, keep the key
    ///
    /// When the pool runs out the whole run stops; the images captured so
    /// far are returned and `pool.is_exhausted()` tells the caller why.
    /// Blank URLs are skipped.
    ///
    /// # Errors
    ///
    /// `Validation` when there are no URLs or no keys (before any request);
    /// `Io` when a screenshot cannot be written.
    pub fn acquire<S: AsRef<str>>(
        &self,
        urls: &[S],
        pool: &mut CredentialPool,
        output_dir: &Path,
    ) -> Result<Vec<SavedImage>, CaptureError> {
        let urls: Vec<&str> = urls
            .iter()
            .map(|u| u.as_ref().trim())
            .filter(|u| !u.is_empty())
            .collect();
        if urls.is_empty() {
            return Err(CaptureError::Validation("no URLs to capture".to_string()));
        }
        if pool.is_empty() {
            return Err(CaptureError::Validation(
                "no screenshot API keys configured".to_string(),
            ));
        }
        if pool.is_exhausted() {
            return Err(CaptureError::Validation(
                "screenshot API keys already exhausted".to_string(),
            ));
        }

        std::fs::create_dir_all(output_dir)?;
        let mut saved = Vec::new();

        for url in &urls {
            while let Some(key) = pool.current().cloned() {
                match self.fetcher.fetch(&key, url) {
                    Ok(response) if response.is_success() => {
                        let path = output_dir.join(filename_for_url(url));
                        std::fs::write(&path, &response.body)?;
                        info!("Screenshot: '{}'", path.display());
                        saved.push(SavedImage {
                            url: url.to_string(),
                            path,
                        });
                        break;
                    }
                    Ok(response) if self.config.is_quota_status(response.status) => {
                        warn!(
                            "Key {} rejected with status {}, rotating",
                            pool.position(),
                            response.status
                        );
                        pool.next();
                    }
                    Ok(response) => {
                        warn!("Failed to capture {} - status {}", url, response.status);
                        break;
                    }
                    Err(e) => {
                        warn!("Error capturing {}: {}, rotating key", url, e);
                        pool.next();
                    }
                }
            }

            if pool.is_exhausted() {
                warn!("All API keys exhausted, stopping after {} capture(s)", saved.len());
                break;
            }
        }

        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockFetcher;
    use tempfile::TempDir;

    fn acquirer(fetcher: &MockFetcher) -> ScreenshotAcquirer<MockFetcher> {
        ScreenshotAcquirer::new(fetcher.clone(), CaptureConfig::default())
    }

    #[test]
    fn test_validation_before_any_request() {
        let dir = TempDir::new().unwrap();
        let fetcher = MockFetcher::new(200);
        let acquirer = acquirer(&fetcher);

        let mut pool = CredentialPool::new(["k1"]);
        let no_urls: [&str; 2] = ["", "  "];
        assert!(matches!(
            acquirer.acquire(&no_urls, &mut pool, dir.path()),
            Err(CaptureError::Validation(_))
        ));

        let mut empty_pool = CredentialPool::default();
        assert!(matches!(
            acquirer.acquire(&["https://a.example"], &mut empty_pool, dir.path()),
            Err(CaptureError::Validation(_))
        ));

        assert_eq!(fetcher.call_count(), 0);
    }

    #[test]
    fn test_success_keeps_key_for_next_url() {
        let dir = TempDir::new().unwrap();
        let fetcher = MockFetcher::new(200);
        let mut pool = CredentialPool::new(["k1", "k2"]);

        let images = acquirer(&fetcher)
            .acquire(&["https://a.example/x", "https://b.example"], &mut pool, dir.path())
            .unwrap();

        assert_eq!(images.len(), 2);
        assert_eq!(images[0].file_name(), "a_example_x.png");
        assert!(images[1].path.exists());
        assert!(fetcher.calls().iter().all(|(key, _)| key == "k1"));
        assert_eq!(pool.position(), 0);
    }

    #[test]
    fn test_other_status_abandons_url_without_rotation() {
        let dir = TempDir::new().unwrap();
        let fetcher = MockFetcher::new(200);
        fetcher.respond_with_status("https://broken.example", 500);
        let mut pool = CredentialPool::new(["k1", "k2"]);

        let images = acquirer(&fetcher)
            .acquire(&["https://broken.example", "https://ok.example"], &mut pool, dir.path())
            .unwrap();

        assert_eq!(images.len(), 1);
        assert_eq!(images[0].url, "https://ok.example");
        assert_eq!(fetcher.call_count(), 2);
        assert_eq!(pool.position(), 0);
    }

    #[test]
    fn test_transport_error_rotates_and_retries_same_url() {
        let dir = TempDir::new().unwrap();
        let fetcher = MockFetcher::new(200);
        fetcher.queue_failure("reset");
        let mut pool = CredentialPool::new(["k1", "k2"]);

        let images = acquirer(&fetcher)
            .acquire(&["https://a.example"], &mut pool, dir.path())
            .unwrap();

        assert_eq!(images.len(), 1);
        assert_eq!(
            fetcher.calls(),
            vec![
                ("k1".to_string(), "https://a.example".to_string()),
                ("k2".to_string(), "https://a.example".to_string()),
            ]
        );
    }
}
