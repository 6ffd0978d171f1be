//! Scripted fetcher for tests

use crate::credentials::ApiKey;
use crate::error::CaptureError;
use crate::fetcher::{FetchResponse, ScreenshotFetcher};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
enum Scripted {
    Status(u16, Vec<u8>),
    Failure(String),
}

#[derive(Debug, Default)]
struct MockState {
    queued: VecDeque<Scripted>,
    by_url: HashMap<String, Scripted>,
    by_key: HashMap<String, Scripted>,
    calls: Vec<(String, String)>,
}

/// Fetcher that answers from a script and records every request
///
/// Resolution order: queued replies, then per-URL replies, then per-key
/// replies, then the default status. Clones share state.
///
/// # Examples
///
/// ```
/// use inkprint_capture::{ApiKey, MockFetcher, ScreenshotFetcher};
///
/// let fetcher = MockFetcher::new(429);
/// fetcher.respond_with_image("https://a.example/", b"png".to_vec());
///
/// let key = ApiKey::new("k1");
/// assert_eq!(fetcher.fetch(&key, "https://a.example/").unwrap().status, 200);
/// assert_eq!(fetcher.fetch(&key, "https://b.example/").unwrap().status, 429);
/// assert_eq!(fetcher.call_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockFetcher {
    default_status: u16,
    state: Arc<Mutex<MockState>>,
}

impl MockFetcher {
    /// Answer every unscripted request with `default_status`
    pub fn new(default_status: u16) -> Self {
        Self {
            default_status,
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Return 200 with `body` for `url`
    pub fn respond_with_image(&self, url: impl Into<String>, body: Vec<u8>) {
        self.state().by_url.insert(url.into(), Scripted::Status(200, body));
    }

    /// Return `status` with an empty body for `url`
    pub fn respond_with_status(&self, url: impl Into<String>, status: u16) {
        self.state()
            .by_url
            .insert(url.into(), Scripted::Status(status, Vec::new()));
    }

    /// Fail at the transport level for `url`
    pub fn fail_url(&self, url: impl Into<String>) {
        self.state()
            .by_url
            .insert(url.into(), Scripted::Failure("connection reset".to_string()));
    }

    /// Return `status` whenever `key` is used
    pub fn respond_for_key(&self, key: impl Into<String>, status: u16) {
        self.state()
            .by_key
            .insert(key.into(), Scripted::Status(status, Vec::new()));
    }

    /// Queue a status for the next request
    pub fn queue_status(&self, status: u16) {
        self.state().queued.push_back(Scripted::Status(status, Vec::new()));
    }

    /// Queue a 200 with `body` for the next request
    pub fn queue_image(&self, body: Vec<u8>) {
        self.state().queued.push_back(Scripted::Status(200, body));
    }

    /// Queue a transport failure for the next request
    pub fn queue_failure(&self, message: impl Into<String>) {
        self.state().queued.push_back(Scripted::Failure(message.into()));
    }

    /// Number of requests made
    pub fn call_count(&self) -> usize {
        self.state().calls.len()
    }

    /// `(key, url)` of every request, oldest first
    pub fn calls(&self) -> Vec<(String, String)> {
        self.state().calls.clone()
    }

    /// URLs requested, oldest first
    pub fn requested_urls(&self) -> Vec<String> {
        self.state().calls.iter().map(|(_, url)| url.clone()).collect()
    }
}

impl Default for MockFetcher {
    fn default() -> Self {
        Self::new(500)
    }
}

impl ScreenshotFetcher for MockFetcher {
    fn fetch(&self, key: &ApiKey, url: &str) -> Result<FetchResponse, CaptureError> {
        let mut state = self.state();
        state.calls.push((key.as_str().to_string(), url.to_string()));

        let scripted = state
            .queued
            .pop_front()
            .or_else(|| state.by_url.get(url).cloned())
            .or_else(|| state.by_key.get(key.as_str()).cloned())
            .unwrap_or_else(|| Scripted::Status(self.default_status, Vec::new()));

        match scripted {
            Scripted::Status(status, body) => Ok(FetchResponse { status, body }),
            Scripted::Failure(message) => Err(CaptureError::Http(message)),
        }
    }
}
