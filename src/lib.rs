//! Qonversion API client library
//!
//! Typed requestor for the Qonversion REST API: URL and header composition,
//! request dispatch through a pluggable transport, and response interpretation
//! into structured responses or typed errors.

pub mod config;
pub mod models;
pub mod services;
pub mod utils;

// Re-export common types
pub use config::{ClientConfig, FileConfig, Settings};
pub use models::{ApiResponse, ErrorPayload, Headers, HttpMethod, ParamValue, Params};
pub use services::{ApiRequestor, ReqwestTransport, RetryConfig, Transport, TransportError, TransportRequest, TransportResponse};
pub use utils::error::{ApiError, ApiResult, ErrorKind};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Library description
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get version information
pub fn version_info() -> String {
    format!("{} v{} - {}", NAME, VERSION, DESCRIPTION)
}
