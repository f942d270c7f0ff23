//! Requestor configuration
//!
//! Explicit configuration handed to [`crate::ApiRequestor`] at construction

use crate::models::Headers;
use crate::services::transport::RetryConfig;
use std::time::Duration;

/// Default base URL of the Qonversion API
pub const DEFAULT_API_BASE: &str = "https://api.qonversion.io/v3";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration read by every request
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API key used when the requestor has no key of its own
    pub api_key: Option<String>,
    /// Base URL that request paths are appended to
    pub api_base: String,
    /// Transport timeout
    pub timeout: Duration,
    /// Transport retry policy
    pub retry: RetryConfig,
    /// Headers sent with every request, below caller-supplied headers
    pub default_headers: Headers,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryConfig::default(),
            default_headers: Headers::new(),
        }
    }
}

impl ClientConfig {
    /// Default configuration with the given API key
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }
}
