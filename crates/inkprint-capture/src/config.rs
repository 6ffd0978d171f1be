//! Configuration for the screenshot API

use serde::{Deserialize, Serialize};

/// Screenshot API settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// API base URL
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,

    /// Viewport, `WIDTHxHEIGHT` or `WIDTHxfull` for full-page captures
    #[serde(default = "default_dimension")]
    pub dimension: String,

    /// Device profile
    #[serde(default = "default_device")]
    pub device: String,

    /// Image format
    #[serde(default = "default_format")]
    pub format: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Statuses meaning the current key is out of quota or unauthorized
    #[serde(default = "default_quota_status_codes")]
    pub quota_status_codes: Vec<u16>,
}

fn default_api_endpoint() -> String {
    "https://api.screenshotmachine.com".to_string()
}

fn default_dimension() -> String {
    "1024xfull".to_string()
}

fn default_device() -> String {
    "desktop".to_string()
}

fn default_format() -> String {
    "png".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_quota_status_codes() -> Vec<u16> {
    vec![432, 403, 429]
}

impl CaptureConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if url::Url::parse(&self.api_endpoint).is_err() {
            return Err(format!("api_endpoint is not a valid URL: {}", self.api_endpoint));
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        if self.format.trim().is_empty() {
            return Err("format must not be empty".to_string());
        }
        if self.quota_status_codes.contains(&200) {
            return Err("quota_status_codes must not contain 200".to_string());
        }
        Ok(())
    }

    /// True when `status` means "try the next key"
    pub fn is_quota_status(&self, status: u16) -> bool {
        self.quota_status_codes.contains(&status)
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            api_endpoint: default_api_endpoint(),
            dimension: default_dimension(),
            device: default_device(),
            format: default_format(),
            request_timeout_secs: default_request_timeout_secs(),
            quota_status_codes: default_quota_status_codes(),
        }
    }
}
