//! Data models module
//!
//! Defines request and response data structures for the Qonversion API

pub mod request;
pub mod response;

pub use request::{Headers, HttpMethod, ParamValue, Params};
pub use response::{ApiResponse, ErrorEnvelope, ErrorPayload};
