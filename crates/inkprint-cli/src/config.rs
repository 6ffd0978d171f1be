//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use inkprint_capture::{CaptureConfig, CredentialPool};
use inkprint_extractor::ExtractorConfig;
use inkprint_llm::AzureOpenAiConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Azure OpenAI connection
    #[serde(default)]
    pub azure: AzureSettings,

    /// Screenshot API keys and request settings
    #[serde(default)]
    pub screenshots: ScreenshotSettings,

    /// Extraction pipeline settings
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Azure OpenAI connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureSettings {
    /// Resource endpoint
    #[serde(default)]
    pub endpoint: String,

    /// API key
    #[serde(default)]
    pub api_key: String,

    /// API version
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Deployment name
    #[serde(default = "default_deployment")]
    pub deployment: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Screenshot API settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScreenshotSettings {
    /// Keys, consumed in order as they run out of quota
    #[serde(default)]
    pub api_keys: Vec<String>,

    /// Request settings
    #[serde(default)]
    pub api: CaptureConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Where capture runs are stored (default `~/.inkprint/cache`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// CSV with a UTF-8 byte order mark
    Csv,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(Self::home_dir()?.join("config.toml"))
    }

    fn home_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".inkprint"))
    }

    /// Load configuration from `path`, or defaults if missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Apply values given on the command line or in the environment.
    pub fn apply_overrides(
        &mut self,
        azure_endpoint: Option<String>,
        azure_api_key: Option<String>,
        screenshot_keys: Option<String>,
    ) {
        if let Some(endpoint) = azure_endpoint {
            self.azure.endpoint = endpoint;
        }
        if let Some(key) = azure_api_key {
            self.azure.api_key = key;
        }
        if let Some(keys) = screenshot_keys {
            self.screenshots.api_keys = keys
                .split(',')
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect();
        }
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.extractor
            .validate()
            .map_err(|e| CliError::Config(format!("[extractor] {}", e)))?;
        self.screenshots
            .api
            .validate()
            .map_err(|e| CliError::Config(format!("[screenshots.api] {}", e)))?;
        Ok(())
    }

    /// Provider settings, failing if the endpoint or key is missing.
    pub fn azure_config(&self) -> Result<AzureOpenAiConfig> {
        if self.azure.endpoint.trim().is_empty() {
            return Err(CliError::Config(
                "Azure OpenAI endpoint not set (AZURE_OPENAI_ENDPOINT or [azure].endpoint)".into(),
            ));
        }
        if self.azure.api_key.trim().is_empty() {
            return Err(CliError::Config(
                "Azure OpenAI API key not set (AZURE_OPENAI_API_KEY or [azure].api_key)".into(),
            ));
        }

        let mut config = AzureOpenAiConfig::new(
            self.azure.endpoint.trim(),
            self.azure.api_key.trim(),
            self.azure.deployment.trim(),
        );
        config.api_version = self.azure.api_version.clone();
        config.timeout_secs = self.azure.timeout_secs;
        Ok(config)
    }

    /// A fresh key pool for one capture run.
    pub fn credential_pool(&self) -> CredentialPool {
        CredentialPool::new(self.screenshots.api_keys.iter().map(String::as_str))
    }

    /// Directory capture runs are written under.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        match &self.settings.cache_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::home_dir()?.join("cache")),
        }
    }
}

impl Default for AzureSettings {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            api_version: default_api_version(),
            deployment: default_deployment(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            cache_dir: None,
        }
    }
}

fn default_api_version() -> String {
    inkprint_llm::azure::DEFAULT_API_VERSION.to_string()
}

fn default_deployment() -> String {
    "gpt-4o".to_string()
}

fn default_timeout_secs() -> u64 {
    inkprint_llm::azure::DEFAULT_TIMEOUT_SECS
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}
