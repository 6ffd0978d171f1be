//! Azure OpenAI Provider Implementation
//!
//! Talks to an Azure OpenAI chat-completions deployment. Vision prompts are
//! sent as a user message with a text part and one `image_url` part carrying
//! a `data:image/png;base64,` URL.
//!
//! # Examples
//!
//! ```no_run
//! use inkprint_llm::{AzureOpenAiConfig, AzureOpenAiProvider};
//!
//! let config = AzureOpenAiConfig::new(
//!     "https://my-resource.openai.azure.com",
//!     "secret",
//!     "gpt-4o",
//! );
//! let provider = AzureOpenAiProvider::new(config).unwrap();
//! ```

use crate::LlmError;
use inkprint_domain::{EncodedImage, LlmProvider, TextCompletionRequest};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// Default API version sent as `api-version`
pub const DEFAULT_API_VERSION: &str = "2024-06-01";

/// Default timeout for LLM requests (120 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Connection settings for one Azure OpenAI deployment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureOpenAiConfig {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`
    pub endpoint: String,

    /// API key sent in the `api-key` header
    pub api_key: String,

    /// API version query parameter
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Deployment (model) name
    pub deployment: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl AzureOpenAiConfig {
    /// Create a config with the default API version and timeout
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        deployment: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            api_version: default_api_version(),
            deployment: deployment.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Full chat-completions URL for this deployment
    pub fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.deployment,
            self.api_version
        )
    }
}

/// Azure OpenAI chat-completions provider
///
/// Calls block the current thread. There is no retry: the pipeline decides
/// how to degrade when a call fails.
pub struct AzureOpenAiProvider {
    config: AzureOpenAiConfig,
    client: reqwest::blocking::Client,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl AzureOpenAiProvider {
    /// Create a new provider
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Other` if the endpoint or key is empty, or the HTTP
    /// client cannot be built.
    pub fn new(config: AzureOpenAiConfig) -> Result<Self, LlmError> {
        if config.endpoint.trim().is_empty() {
            return Err(LlmError::Other("Azure OpenAI endpoint is not set".to_string()));
        }
        if config.api_key.trim().is_empty() {
            return Err(LlmError::Other("Azure OpenAI API key is not set".to_string()));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Deployment name used for requests
    pub fn deployment(&self) -> &str {
        &self.config.deployment
    }

    fn vision_body(prompt: &str, image: &EncodedImage) -> Value {
        json!({
            "messages": [
                {
                    "role": "user",
                    "content": [
                        { "type": "text", "text": prompt },
                        {
                            "type": "image_url",
                            "image_url": {
                                "url": format!("data:image/png;base64,{}", image.as_str())
                            }
                        }
                    ]
                }
            ]
        })
    }

    fn text_body(request: &TextCompletionRequest) -> Value {
        json!({
            "messages": [
                { "role": "system", "content": request.system_prompt },
                { "role": "user", "content": request.user_content },
            ],
            "response_format": { "type": request.response_format.as_str() },
            "temperature": request.temperature,
            "top_p": request.top_p,
            "frequency_penalty": request.frequency_penalty,
            "presence_penalty": request.presence_penalty,
            "stop": request.stop,
        })
    }

    fn send(&self, body: &Value) -> Result<String, LlmError> {
        let response = self
            .client
            .post(self.config.completions_url())
            .header("api-key", &self.config.api_key)
            .json(body)
            .send()
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimitExceeded);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(self.config.deployment.clone()));
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Communication(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("Response has no message content".to_string()))?;

        debug!("Completion returned {} chars", content.len());
        Ok(content)
    }
}

impl LlmProvider for AzureOpenAiProvider {
    type Error = LlmError;

    fn complete_vision(&self, prompt: &str, image: &EncodedImage) -> Result<String, Self::Error> {
        self.send(&Self::vision_body(prompt, image))
    }

    fn complete_text(&self, request: &TextCompletionRequest) -> Result<String, Self::Error> {
        self.send(&Self::text_body(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkprint_domain::ResponseFormat;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Answer one request with `status` and `body`; joining the handle yields
    /// the request head and body
    fn serve_once(status: u16, body: &str) -> (String, thread::JoinHandle<(String, String)>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());
        let body = body.to_string();

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut head = String::new();
            let mut content_length = 0;
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap();
                    }
                }
                head.push_str(&line);
            }
            let mut request_body = vec![0; content_length];
            reader.read_exact(&mut request_body).unwrap();

            write!(
                stream,
                "HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            )
            .unwrap();

            (head, String::from_utf8(request_body).unwrap())
        });

        (endpoint, handle)
    }

    fn local_provider(endpoint: String) -> AzureOpenAiProvider {
        let mut cfg = AzureOpenAiConfig::new(endpoint, "secret-key", "gpt-4o");
        cfg.timeout_secs = 5;
        AzureOpenAiProvider::new(cfg).unwrap()
    }

    #[test]
    fn test_vision_call_round_trip() {
        let (endpoint, server) =
            serve_once(200, r#"{"choices": [{"message": {"role": "assistant", "content": "yes"}}]}"#);

        let reply = local_provider(endpoint)
            .complete_vision("is alice here?", &EncodedImage::new("QUJD"))
            .unwrap();
        assert_eq!(reply, "yes");

        let (head, body) = server.join().unwrap();
        assert!(head.starts_with(
            "POST /openai/deployments/gpt-4o/chat/completions?api-version=2024-06-01 HTTP/1.1\r\n"
        ));
        assert!(head.to_ascii_lowercase().contains("api-key: secret-key\r\n"));

        let sent: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(sent["messages"][0]["content"][0]["text"], "is alice here?");
        assert_eq!(
            sent["messages"][0]["content"][1]["image_url"]["url"],
            "data:image/png;base64,QUJD"
        );
    }

    #[test]
    fn test_text_call_sends_sampling_settings() {
        let (endpoint, server) =
            serve_once(200, r#"{"choices": [{"message": {"content": "{\"keywords\": []}"}}]}"#);

        let reply = local_provider(endpoint)
            .complete_text(&TextCompletionRequest::new("sys", "article"))
            .unwrap();
        assert_eq!(reply, r#"{"keywords": []}"#);

        let (_, body) = server.join().unwrap();
        let sent: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(sent["response_format"]["type"], "json_object");
        assert!((sent["top_p"].as_f64().unwrap() - 0.95).abs() < 1e-6);
        assert_eq!(sent["messages"][1]["content"], "article");
    }

    #[test]
    fn test_rate_limit_status_maps_to_rate_limit_error() {
        let (endpoint, server) = serve_once(429, r#"{"error": "slow down"}"#);
        let result = local_provider(endpoint).complete_vision("p", &EncodedImage::new("QUJD"));
        assert!(matches!(result, Err(LlmError::RateLimitExceeded)));
        server.join().unwrap();
    }

    #[test]
    fn test_not_found_maps_to_model_not_available() {
        let (endpoint, server) = serve_once(404, r#"{"error": "no deployment"}"#);
        let result = local_provider(endpoint).complete_vision("p", &EncodedImage::new("QUJD"));
        match result {
            Err(LlmError::ModelNotAvailable(deployment)) => assert_eq!(deployment, "gpt-4o"),
            other => panic!("expected ModelNotAvailable, got {:?}", other),
        }
        server.join().unwrap();
    }

    #[test]
    fn test_server_error_carries_status_and_body() {
        let (endpoint, server) = serve_once(500, "backend exploded");
        let result = local_provider(endpoint).complete_vision("p", &EncodedImage::new("QUJD"));
        match result {
            Err(LlmError::Communication(message)) => {
                assert!(message.contains("500"));
                assert!(message.contains("backend exploded"));
            }
            other => panic!("expected Communication, got {:?}", other),
        }
        server.join().unwrap();
    }

    #[test]
    fn test_missing_content_is_invalid_response() {
        let (endpoint, server) = serve_once(200, r#"{"choices": [{"message": {"content": null}}]}"#);
        let result = local_provider(endpoint).complete_vision("p", &EncodedImage::new("QUJD"));
        assert!(matches!(result, Err(LlmError::InvalidResponse(_))));
        server.join().unwrap();

        let (endpoint, server) = serve_once(200, r#"{"choices": []}"#);
        let result = local_provider(endpoint).complete_vision("p", &EncodedImage::new("QUJD"));
        assert!(matches!(result, Err(LlmError::InvalidResponse(_))));
        server.join().unwrap();
    }

    #[test]
    fn test_non_json_body_is_invalid_response() {
        let (endpoint, server) = serve_once(200, "<html>gateway</html>");
        let result = local_provider(endpoint).complete_vision("p", &EncodedImage::new("QUJD"));
        assert!(matches!(result, Err(LlmError::InvalidResponse(_))));
        server.join().unwrap();
    }

    fn config() -> AzureOpenAiConfig {
        AzureOpenAiConfig::new("https://example.openai.azure.com/", "key", "gpt-4o")
    }

    #[test]
    fn test_completions_url() {
        assert_eq!(
            config().completions_url(),
            "https://example.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2024-06-01"
        );
    }

    #[test]
    fn test_provider_creation() {
        let provider = AzureOpenAiProvider::new(config()).unwrap();
        assert_eq!(provider.deployment(), "gpt-4o");
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let mut cfg = config();
        cfg.api_key = "  ".to_string();
        assert!(matches!(AzureOpenAiProvider::new(cfg), Err(LlmError::Other(_))));

        let mut cfg = config();
        cfg.endpoint = String::new();
        assert!(AzureOpenAiProvider::new(cfg).is_err());
    }

    #[test]
    fn test_vision_body_embeds_data_url() {
        let body = AzureOpenAiProvider::vision_body("who wrote this?", &EncodedImage::new("QUJD"));
        let parts = &body["messages"][0]["content"];
        assert_eq!(parts[0]["text"], "who wrote this?");
        assert_eq!(parts[1]["image_url"]["url"], "data:image/png;base64,QUJD");
    }

    #[test]
    fn test_text_body_carries_sampling_settings() {
        let request = TextCompletionRequest::new("sys", "user");
        let body = AzureOpenAiProvider::text_body(&request);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "user");
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["temperature"], 0.0);
        assert!(body["stop"].is_null());

        let text = request.with_response_format(ResponseFormat::Text);
        assert_eq!(AzureOpenAiProvider::text_body(&text)["response_format"]["type"], "text");
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let cfg: AzureOpenAiConfig = serde_json::from_str(
            r#"{"endpoint": "https://e", "api_key": "k", "deployment": "d"}"#,
        )
        .unwrap();
        assert_eq!(cfg.api_version, DEFAULT_API_VERSION);
        assert_eq!(cfg.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_unreachable_endpoint_is_communication_error() {
        let mut cfg = AzureOpenAiConfig::new("http://127.0.0.1:9", "key", "gpt-4o");
        cfg.timeout_secs = 2;
        let provider = AzureOpenAiProvider::new(cfg).unwrap();

        let result = provider.complete_vision("p", &EncodedImage::new("QUJD"));
        assert!(matches!(result, Err(LlmError::Communication(_))));
    }
}
