//! Response data models
//!
//! Interpreted API responses and the server's error payload schema

use super::request::Headers;
use crate::utils::error::{helpers, ApiResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A successfully interpreted API response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    body: String,
    status: u16,
    headers: Headers,
    data: serde_json::Value,
}

impl ApiResponse {
    pub(crate) fn new(body: String, status: u16, headers: Headers, data: serde_json::Value) -> Self {
        Self {
            body,
            status,
            headers,
            data,
        }
    }

    /// Raw response body
    pub fn body(&self) -> &str {
        &self.body
    }

    /// HTTP status code
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Parsed response body
    pub fn data(&self) -> &serde_json::Value {
        &self.data
    }

    /// Decode the parsed body into a typed model
    pub fn json<T: DeserializeOwned>(&self) -> ApiResult<T> {
        T::deserialize(&self.data).map_err(|e| {
            helpers::api_error(
                format!("Unexpected response shape from API: {}", e),
                &self.body,
                self.status,
            )
        })
    }
}

/// Top-level error envelope: `{"error": {...}}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub error: Option<ErrorPayload>,
}

/// Server error description; every field is optional
///
/// A field holding an unexpected JSON type decodes as `None` instead of
/// rejecting the whole payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Machine-readable error code
    #[serde(default, deserialize_with = "string_or_number")]
    pub code: Option<String>,
    /// Error type
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub error_type: Option<String>,
    /// Error message
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: Option<String>,
    /// Offending request parameter
    #[serde(default, deserialize_with = "lenient_string")]
    pub param: Option<String>,
}

/// Accept strings; anything else becomes `None`
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Accept codes sent either as strings or as numbers
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
