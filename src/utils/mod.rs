//! Utilities module
//!
//! Contains error handling, URL and header builders, and logging helpers

pub mod error;
pub mod headers;
pub mod logging;
pub mod url;
