//! File-based configuration loading
//!
//! Loads client configuration from a JSON file

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Client configuration loaded from JSON file
///
/// Every field is optional; unset fields fall back to the environment or
/// built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    /// API key
    #[serde(rename = "apiKey", skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the Qonversion API
    #[serde(rename = "apiBase", skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    /// Request timeout in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Maximum transport retries
    #[serde(rename = "maxRetries", skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,

    /// Extra headers sent with every request
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

impl FileConfig {
    /// Load configuration from JSON file
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading configuration from: {:?}", path);

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: FileConfig =
            serde_json::from_str(&content).with_context(|| "Failed to parse config JSON")?;

        config.validate()?;

        debug!("Loaded {} default headers", config.headers.len());
        Ok(config)
    }

    /// Load configuration from default locations
    /// Searches in order:
    /// 1. ~/.config/qonversion/qonversion.json
    /// 2. ./qonversion.json
    ///
    /// Returns `None` if neither file exists.
    pub fn load_default() -> Result<Option<Self>> {
        match Self::default_path() {
            Some(path) => Self::load(&path).map(Some),
            None => Ok(None),
        }
    }

    /// First existing default configuration path
    pub fn default_path() -> Option<PathBuf> {
        if let Some(home) = dirs::home_dir() {
            let config_path = home.join(".config").join("qonversion").join("qonversion.json");
            if config_path.exists() {
                return Some(config_path);
            }
        }

        let local_path = PathBuf::from("qonversion.json");
        if local_path.exists() {
            return Some(local_path);
        }

        None
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if let Some(api_key) = &self.api_key {
            if api_key.trim().is_empty() {
                anyhow::bail!("apiKey cannot be empty when present");
            }
        }

        if let Some(api_base) = &self.api_base {
            if !api_base.starts_with("http") {
                anyhow::bail!("Invalid apiBase: {}", api_base);
            }
        }

        if self.timeout == Some(0) {
            anyhow::bail!("timeout cannot be 0");
        }

        for name in self.headers.keys() {
            if name.trim().is_empty() || name.contains(char::is_whitespace) {
                anyhow::bail!("Invalid header name: {:?}", name);
            }
        }

        Ok(())
    }
}
