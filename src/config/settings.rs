//! Application configuration settings
//!
//! Defines all configuration structures and loading logic

use super::client::{ClientConfig, DEFAULT_API_BASE, DEFAULT_TIMEOUT_SECS};
use super::file::FileConfig;
use crate::models::Headers;
use crate::services::transport::RetryConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Qonversion API configuration
    pub api: ApiConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Qonversion API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API key (optional; a requestor may carry its own)
    pub api_key: Option<String>,
    /// API base URL
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout: u64,
    /// Maximum transport retries
    pub max_retries: u32,
    /// Headers sent with every request
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (text/json)
    pub format: String,
}

impl Settings {
    /// Create a new configuration instance from the environment
    pub fn new() -> Result<Self> {
        Self::load(None)
    }

    /// Create a configuration from the environment, falling back to `file`
    /// for values the environment does not set
    pub fn with_file(file: &FileConfig) -> Result<Self> {
        Self::load(Some(file))
    }

    fn load(file: Option<&FileConfig>) -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        let empty = FileConfig::default();
        let file = file.unwrap_or(&empty);

        let timeout = match get_env("QONVERSION_TIMEOUT") {
            Some(raw) => raw.parse().context("Invalid timeout value")?,
            None => file.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };

        let max_retries = match get_env("QONVERSION_MAX_RETRIES") {
            Some(raw) => raw.parse().context("Invalid maximum retries value")?,
            None => file
                .max_retries
                .unwrap_or_else(|| RetryConfig::default().max_retries),
        };

        let settings = Self {
            api: ApiConfig {
                api_key: get_env("QONVERSION_API_KEY").or_else(|| file.api_key.clone()),
                base_url: get_env("QONVERSION_API_BASE")
                    .or_else(|| file.api_base.clone())
                    .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
                timeout,
                max_retries,
                headers: file.headers.clone(),
            },
            logging: LoggingConfig {
                level: get_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
                format: get_env("LOG_FORMAT").unwrap_or_else(|| "text".to_string()),
            },
        };

        // Validate configuration
        settings.validate()?;

        Ok(settings)
    }

    /// Validate configuration validity
    fn validate(&self) -> Result<()> {
        if let Some(api_key) = &self.api.api_key {
            if api_key.contains(char::is_whitespace) {
                anyhow::bail!("Qonversion API key cannot contain whitespace characters");
            }
        }

        let base = url::Url::parse(&self.api.base_url)
            .with_context(|| format!("Invalid API base URL: {}", self.api.base_url))?;
        if !matches!(base.scheme(), "http" | "https") {
            anyhow::bail!("Invalid API base URL scheme, should be http or https: {}", self.api.base_url);
        }

        if self.api.timeout == 0 {
            anyhow::bail!("Timeout value cannot be 0");
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            anyhow::bail!("Invalid log level: {}", self.logging.level);
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            anyhow::bail!("Invalid log format: {}", self.logging.format);
        }

        Ok(())
    }

    /// Build the requestor configuration
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_key: self.api.api_key.clone(),
            api_base: self.api.base_url.clone(),
            timeout: Duration::from_secs(self.api.timeout),
            retry: RetryConfig {
                max_retries: self.api.max_retries,
                ..RetryConfig::default()
            },
            default_headers: self
                .api
                .headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect::<Headers>(),
        }
    }
}

/// Get a non-empty environment variable
fn get_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
