//! Screenshot transport

use crate::config::CaptureConfig;
use crate::credentials::ApiKey;
use crate::error::CaptureError;
use std::time::Duration;
use tracing::debug;

/// Status and body of one screenshot request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP status
    pub status: u16,
    /// Image bytes on success; may be empty otherwise
    pub body: Vec<u8>,
}

impl FetchResponse {
    /// True for HTTP 200
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Issues one screenshot request
///
/// An `Err` is a transport failure (no HTTP status was received). Any
/// received status, including failures, is an `Ok`.
pub trait ScreenshotFetcher {
    /// Request a screenshot of `url` using `key`
    fn fetch(&self, key: &ApiKey, url: &str) -> Result<FetchResponse, CaptureError>;
}

impl<F: ScreenshotFetcher + ?Sized> ScreenshotFetcher for &F {
    fn fetch(&self, key: &ApiKey, url: &str) -> Result<FetchResponse, CaptureError> {
        (**self).fetch(key, url)
    }
}

/// ScreenshotMachine HTTP client
pub struct ScreenshotMachineClient {
    client: reqwest::blocking::Client,
    config: CaptureConfig,
}

impl ScreenshotMachineClient {
    /// Create a client
    ///
    /// # Errors
    ///
    /// `Validation` for an invalid config, `Http` if the client cannot be
    /// built.
    pub fn new(config: CaptureConfig) -> Result<Self, CaptureError> {
        config.validate().map_err(CaptureError::Validation)?;

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Configuration in use
    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }
}

impl ScreenshotFetcher for ScreenshotMachineClient {
    fn fetch(&self, key: &ApiKey, url: &str) -> Result<FetchResponse, CaptureError> {
        debug!("GET {} for {}", self.config.api_endpoint, url);

        let response = self
            .client
            .get(&self.config.api_endpoint)
            .query(&[
                ("key", key.as_str()),
                ("url", url),
                ("dimension", self.config.dimension.as_str()),
                ("device", self.config.device.as_str()),
                ("format", self.config.format.as_str()),
            ])
            .send()?;

        let status = response.status().as_u16();
        let body = if status == 200 {
            response.bytes()?.to_vec()
        } else {
            Vec::new()
        };

        Ok(FetchResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquirer::ScreenshotAcquirer;
    use crate::credentials::CredentialPool;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;
    use tempfile::TempDir;

    /// Answer one connection per canned `(status, body)`; joining the handle
    /// yields each request's line and headers
    fn serve(responses: Vec<(u16, Vec<u8>)>) -> (String, thread::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let mut requests = Vec::new();
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().unwrap();
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut head = String::new();
                loop {
                    let mut line = String::new();
                    if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                        break;
                    }
                    head.push_str(&line);
                }
                requests.push(head);

                write!(
                    stream,
                    "HTTP/1.1 {} Canned\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    status,
                    body.len()
                )
                .unwrap();
                stream.write_all(&body).unwrap();
            }
            requests
        });

        (endpoint, handle)
    }

    fn client(endpoint: String) -> ScreenshotMachineClient {
        ScreenshotMachineClient::new(CaptureConfig {
            api_endpoint: endpoint,
            request_timeout_secs: 5,
            ..CaptureConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_request_carries_capture_parameters() {
        let (endpoint, server) = serve(vec![(200, b"\x89PNG".to_vec())]);

        let response = client(endpoint)
            .fetch(&ApiKey::new("k1"), "https://a.example/x?y=1")
            .unwrap();

        assert!(response.is_success());
        assert_eq!(response.body, b"\x89PNG");

        let requests = server.join().unwrap();
        assert!(requests[0].starts_with(
            "GET /?key=k1&url=https%3A%2F%2Fa.example%2Fx%3Fy%3D1\
             &dimension=1024xfull&device=desktop&format=png HTTP/1.1\r\n"
        ));
    }

    #[test]
    fn test_failure_status_passes_through_without_body() {
        let (endpoint, server) = serve(vec![
            (429, b"quota exceeded".to_vec()),
            (500, b"internal".to_vec()),
        ]);
        let client = client(endpoint);
        let key = ApiKey::new("k1");

        let limited = client.fetch(&key, "https://a.example").unwrap();
        assert_eq!(limited.status, 429);
        assert!(limited.body.is_empty());

        let broken = client.fetch(&key, "https://a.example").unwrap();
        assert_eq!(broken.status, 500);
        assert!(broken.body.is_empty());

        assert_eq!(server.join().unwrap().len(), 2);
    }

    #[test]
    fn test_quota_status_over_http_rotates_key() {
        let (endpoint, server) = serve(vec![(429, Vec::new()), (200, b"png".to_vec())]);
        let client = client(endpoint);
        let acquirer = ScreenshotAcquirer::new(&client, client.config().clone());
        let dir = TempDir::new().unwrap();
        let mut pool = CredentialPool::new(["k1", "k2"]);

        let images = acquirer
            .acquire(&["https://a.example"], &mut pool, dir.path())
            .unwrap();

        assert_eq!(images.len(), 1);
        assert_eq!(std::fs::read(&images[0].path).unwrap(), b"png");
        assert_eq!(pool.position(), 1);

        let requests = server.join().unwrap();
        assert!(requests[0].starts_with("GET /?key=k1&"));
        assert!(requests[1].starts_with("GET /?key=k2&"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = CaptureConfig::default();
        config.request_timeout_secs = 0;
        assert!(matches!(
            ScreenshotMachineClient::new(config),
            Err(CaptureError::Validation(_))
        ));
    }

    #[test]
    fn test_unreachable_endpoint_is_transport_error() {
        let config = CaptureConfig {
            api_endpoint: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: 2,
            ..CaptureConfig::default()
        };
        let client = ScreenshotMachineClient::new(config).unwrap();

        let result = client.fetch(&ApiKey::new("k"), "https://example.com");
        assert!(matches!(result, Err(CaptureError::Http(_))));
    }
}
