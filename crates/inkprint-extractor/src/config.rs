//! Configuration for the Extractor

use serde::{Deserialize, Serialize};

/// Configuration for batch extraction and keyword analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Maximum number of images accepted in one batch
    #[serde(default = "default_max_images")]
    pub max_images: usize,

    /// Tokens starting with this prefix are removed from extracted content
    #[serde(default = "default_redact_prefix")]
    pub redact_prefix: String,

    /// Keyword count used when the caller does not ask for one
    #[serde(default = "default_keyword_count")]
    pub default_keyword_count: usize,

    /// Upper bound for requested keyword counts
    #[serde(default = "default_max_keyword_count")]
    pub max_keyword_count: usize,
}

fn default_max_images() -> usize {
    500
}

fn default_redact_prefix() -> String {
    "https://".to_string()
}

fn default_keyword_count() -> usize {
    5
}

fn default_max_keyword_count() -> usize {
    20
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_images == 0 {
            return Err("max_images must be greater than 0".to_string());
        }
        if self.redact_prefix.trim().is_empty() {
            return Err("redact_prefix must not be empty".to_string());
        }
        if self.max_keyword_count == 0 {
            return Err("max_keyword_count must be greater than 0".to_string());
        }
        if self.default_keyword_count == 0 || self.default_keyword_count > self.max_keyword_count {
            return Err(format!(
                "default_keyword_count must be between 1 and {}",
                self.max_keyword_count
            ));
        }
        Ok(())
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

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_images: default_max_images(),
            redact_prefix: default_redact_prefix(),
            default_keyword_count: default_keyword_count(),
            max_keyword_count: default_max_keyword_count(),
        }
    }
}
