//! Service layer module
//!
//! Contains the API requestor, response interpreter and HTTP transport

pub mod interpreter;
pub mod requestor;
pub mod transport;

pub use interpreter::interpret_response;
pub use requestor::ApiRequestor;
pub use transport::{ReqwestTransport, RetryConfig, Transport, TransportError, TransportRequest, TransportResponse};
