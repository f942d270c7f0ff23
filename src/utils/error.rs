//! Error handling module
//!
//! Defines the error taxonomy returned by the API requestor

use crate::services::transport::TransportError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by the API requestor
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Generic API error: unexpected status, unparseable body or malformed error payload
    #[error("{message}")]
    Api {
        message: String,
        http_body: Option<String>,
        http_status: Option<u16>,
    },

    /// The request was rejected as malformed (HTTP 400)
    #[error("{message}")]
    InvalidRequest {
        message: String,
        /// Offending parameter reported by the server
        param: Option<String>,
        http_body: Option<String>,
        http_status: Option<u16>,
    },

    /// No credential available, or the server returned HTTP 401
    #[error("{message}")]
    Authentication {
        message: String,
        http_body: Option<String>,
        http_status: Option<u16>,
    },

    /// The request never produced a response: transport failure or invalid usage
    #[error("{message}")]
    Connection { message: String },
}

/// Discriminant of [`ApiError`] for callers that branch on the kind only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Api,
    InvalidRequest,
    Authentication,
    Connection,
}

impl ApiError {
    /// Error kind without payload
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Api { .. } => ErrorKind::Api,
            ApiError::InvalidRequest { .. } => ErrorKind::InvalidRequest,
            ApiError::Authentication { .. } => ErrorKind::Authentication,
            ApiError::Connection { .. } => ErrorKind::Connection,
        }
    }

    /// Human-readable message
    pub fn message(&self) -> &str {
        match self {
            ApiError::Api { message, .. }
            | ApiError::InvalidRequest { message, .. }
            | ApiError::Authentication { message, .. }
            | ApiError::Connection { message } => message,
        }
    }

    /// Raw response body, when a response was received
    pub fn http_body(&self) -> Option<&str> {
        match self {
            ApiError::Api { http_body, .. }
            | ApiError::InvalidRequest { http_body, .. }
            | ApiError::Authentication { http_body, .. } => http_body.as_deref(),
            ApiError::Connection { .. } => None,
        }
    }

    /// HTTP status code, when a response was received
    pub fn http_status(&self) -> Option<u16> {
        match self {
            ApiError::Api { http_status, .. }
            | ApiError::InvalidRequest { http_status, .. }
            | ApiError::Authentication { http_status, .. } => *http_status,
            ApiError::Connection { .. } => None,
        }
    }

    /// Get error type string
    pub fn error_type(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Api => "api_error",
            ErrorKind::InvalidRequest => "invalid_request_error",
            ErrorKind::Authentication => "authentication_error",
            ErrorKind::Connection => "api_connection_error",
        }
    }

    /// Whether detailed error information should be logged
    pub fn should_log_details(&self) -> bool {
        !matches!(self, ApiError::Authentication { .. })
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        ApiError::Connection {
            message: format!("Error communicating with Qonversion: {}", err),
        }
    }
}

/// Result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Error construction helpers
pub mod helpers {
    use super::*;

    /// Create generic API error
    pub fn api_error(message: impl Into<String>, body: &str, status: u16) -> ApiError {
        ApiError::Api {
            message: message.into(),
            http_body: Some(body.to_string()),
            http_status: Some(status),
        }
    }

    /// Create invalid request error
    pub fn invalid_request_error(
        message: impl Into<String>,
        param: Option<String>,
        body: &str,
        status: u16,
    ) -> ApiError {
        ApiError::InvalidRequest {
            message: message.into(),
            param,
            http_body: Some(body.to_string()),
            http_status: Some(status),
        }
    }

    /// Create authentication error from a server response
    pub fn authentication_error(message: impl Into<String>, body: &str, status: u16) -> ApiError {
        ApiError::Authentication {
            message: message.into(),
            http_body: Some(body.to_string()),
            http_status: Some(status),
        }
    }

    /// Create authentication error for a request that was never sent
    pub fn missing_api_key_error() -> ApiError {
        ApiError::Authentication {
            message: "No API key provided. Set QONVERSION_API_KEY in the environment, \
                      add \"apiKey\" to qonversion.json, or pass an explicit key to the requestor."
                .to_string(),
            http_body: None,
            http_status: None,
        }
    }

    /// Create connection error
    pub fn connection_error(message: impl Into<String>) -> ApiError {
        ApiError::Connection {
            message: message.into(),
        }
    }
}
