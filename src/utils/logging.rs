//! Logging utilities
//!
//! Shared subscriber setup and helpers for keeping request logs readable

use anyhow::{Context, Result};

/// Set to true to log full response bodies at debug level
/// Default is false to reduce log verbosity
pub const VERBOSE_BODY_LOGGING: bool = false;

/// Bodies longer than this are truncated in debug logs
pub const MAX_LOGGED_BODY: usize = 2048;

/// Truncate a string with a note about original length
pub fn truncate_content(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut cut = max_len;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}... ({} chars truncated)", &s[..cut], s.len() - cut)
}

/// Body as it should appear in debug logs
pub fn body_for_log(body: &str) -> String {
    if VERBOSE_BODY_LOGGING {
        body.to_string()
    } else {
        truncate_content(body, MAX_LOGGED_BODY)
    }
}

/// Install the global tracing subscriber
///
/// `format` is either `text` (human readable) or `json` (production).
pub fn init_logging(level: &str, format: &str) -> Result<()> {
    let subscriber: Box<dyn tracing::Subscriber + Send + Sync> = if format == "json" {
        Box::new(
            tracing_subscriber::fmt()
                .with_env_filter(level)
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr)
                .finish(),
        )
    } else {
        Box::new(
            tracing_subscriber::fmt()
                .with_env_filter(level)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_writer(std::io::stderr)
                .finish(),
        )
    };

    tracing::subscriber::set_global_default(subscriber).context("Failed to set tracing subscriber")
}
