//! HTTP transport layer
//!
//! The requestor hands fully composed requests to a [`Transport`] and gets
//! raw responses back. Timeouts and retries live here, not in the requestor.

use crate::models::{Headers, HttpMethod, Params};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// A composed request ready to be sent
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: HttpMethod,
    /// Absolute URL, query string included
    pub url: String,
    pub headers: Headers,
    /// Body parameters; only set for POST
    pub body: Option<Params>,
}

/// Raw response returned by a transport
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: String,
}

/// Failures that prevented a response from being received
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("{0}")]
    Other(String),
}

/// Network collaborator used by the requestor
#[async_trait]
pub trait Transport: Send + Sync {
    /// Get the transport name
    fn name(&self) -> &str;

    /// Send a request and return the raw response
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

/// Retry configuration
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum retry attempts
    pub max_retries: u32,
    /// Base delay time (milliseconds)
    pub base_delay_ms: u64,
    /// Maximum delay time (milliseconds)
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay_ms: 500,
            max_delay_ms: 5000,
        }
    }
}

impl RetryConfig {
    /// Backoff before retry number `attempt` (zero-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2_u64.checked_pow(attempt).unwrap_or(u64::MAX);
        let delay = self.base_delay_ms.saturating_mul(factor);
        Duration::from_millis(std::cmp::min(delay, self.max_delay_ms))
    }
}

/// Status codes worth another attempt
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 502 | 503 | 504)
}

/// Whether a failed attempt may be repeated
///
/// Connect failures and 429 mean the server never processed the request, so
/// every verb is retried. A timeout or gateway error may follow a completed
/// write, so those are only retried for GET and DELETE.
fn should_retry(method: HttpMethod, result: &Result<TransportResponse, TransportError>) -> bool {
    let idempotent = method != HttpMethod::Post;
    match result {
        Ok(response) if response.status == 429 => true,
        Ok(response) => idempotent && is_retryable_status(response.status),
        Err(TransportError::Connection(_)) => true,
        Err(TransportError::Timeout) => idempotent,
        Err(TransportError::Other(_)) => false,
    }
}

/// Default transport backed by [`reqwest`]
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    retry_config: RetryConfig,
}

impl ReqwestTransport {
    /// Create a transport with default timeout and retry policy
    pub fn new() -> Result<Self> {
        Self::with_options(Duration::from_secs(30), RetryConfig::default())
    }

    /// Create a transport with a custom timeout and retry policy
    pub fn with_options(timeout: Duration, retry_config: RetryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            retry_config,
        })
    }

    async fn send_once(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in request.headers.iter() {
            builder = builder.header(name, value);
        }

        if let Some(body) = &request.body {
            let is_form = request
                .headers
                .get("content-type")
                .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
                .unwrap_or(false);
            builder = if is_form { builder.form(body) } else { builder.json(body) };
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.as_str().to_string(), v.to_string())))
            .collect();
        let body = response.text().await.map_err(map_reqwest_error)?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    fn name(&self) -> &str {
        "reqwest"
    }

    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let mut attempt = 0;
        loop {
            let result = self.send_once(&request).await;
            if !should_retry(request.method, &result) || attempt >= self.retry_config.max_retries {
                return result;
            }

            let delay = self.retry_config.delay_for(attempt);
            match &result {
                Ok(response) => warn!(
                    "Request returned HTTP {}, retrying after {}ms (attempt {}/{})",
                    response.status,
                    delay.as_millis(),
                    attempt + 1,
                    self.retry_config.max_retries
                ),
                Err(e) => warn!(
                    "Request failed: {}, retrying after {}ms (attempt {}/{})",
                    e,
                    delay.as_millis(),
                    attempt + 1,
                    self.retry_config.max_retries
                ),
            }
            tokio::time::sleep(delay).await;
            attempt += 1;
            debug!("Retrying {} {}", request.method, request.url);
        }
    }
}

/// Map a reqwest error to our [`TransportError`]
fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}
