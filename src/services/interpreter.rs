//! Response interpretation
//!
//! Turns raw transport responses into [`ApiResponse`] values or typed errors

use crate::models::{ApiResponse, ErrorEnvelope, Headers};
use crate::utils::error::{helpers, ApiResult};
use tracing::info;

/// Interpret a raw response
///
/// A body that is not JSON is always an error, even on 2xx. Non-2xx bodies
/// must carry an `error` object; its `message` becomes the error message.
pub fn interpret_response(body: String, status: u16, headers: Headers) -> ApiResult<ApiResponse> {
    let data: serde_json::Value = match serde_json::from_str(&body) {
        Ok(data) => data,
        Err(_) => {
            return Err(helpers::api_error(
                format!(
                    "Invalid response body from API: {} (HTTP response code was {})",
                    body, status
                ),
                &body,
                status,
            ))
        }
    };

    if (200..300).contains(&status) {
        return Ok(ApiResponse::new(body, status, headers, data));
    }

    let payload = match serde_json::from_value::<ErrorEnvelope>(data) {
        Ok(ErrorEnvelope { error: Some(payload) }) => payload,
        _ => {
            return Err(helpers::api_error(
                format!(
                    "Invalid response object from API: {} (HTTP response code was {})",
                    body, status
                ),
                &body,
                status,
            ))
        }
    };

    let message = payload
        .message
        .clone()
        .unwrap_or_else(|| format!("API request failed with HTTP status {}", status));

    let err = match status {
        400 => helpers::invalid_request_error(message, payload.param.clone(), &body, status),
        401 => helpers::authentication_error(message, &body, status),
        _ => helpers::api_error(message, &body, status),
    };

    if err.should_log_details() {
        info!(
            status,
            code = payload.code.as_deref().unwrap_or(""),
            error_type = payload.error_type.as_deref().unwrap_or(""),
            error_message = payload.message.as_deref().unwrap_or(""),
            param = payload.param.as_deref().unwrap_or(""),
            "Qonversion API error received"
        );
    } else {
        info!(status, "Qonversion API authentication failed");
    }

    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::{ApiError, ErrorKind};
    use std::sync::{Arc, Mutex};

    fn interpret(body: &str, status: u16) -> ApiResult<ApiResponse> {
        interpret_response(body.to_string(), status, Headers::new())
    }

    #[test]
    fn test_success() {
        let response = interpret(r#"{"id": "u1"}"#, 200).unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(response.data()["id"], "u1");
    }

    #[test]
    fn test_success_range_upper_bound() {
        assert!(interpret("{}", 299).is_ok());
        assert!(interpret("{}", 300).is_err());
    }

    #[test]
    fn test_unparseable_body_even_on_success() {
        let err = interpret("<html>oops</html>", 200).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);
        assert!(err.message().contains("<html>oops</html>"));
        assert!(err.message().contains("200"));
        assert_eq!(err.http_status(), Some(200));
    }

    #[test]
    fn test_bad_request_maps_to_invalid_request() {
        let err = interpret(r#"{"error": {"message": "bad param", "code": "x", "param": "id"}}"#, 400)
            .unwrap_err();
        match err {
            ApiError::InvalidRequest { message, param, http_status, .. } => {
                assert_eq!(message, "bad param");
                assert_eq!(param.as_deref(), Some("id"));
                assert_eq!(http_status, Some(400));
            }
            other => panic!("Expected invalid request error, got {:?}", other),
        }
    }

    #[test]
    fn test_unauthorized_maps_to_authentication() {
        let err = interpret(r#"{"error": {"message": "invalid key"}}"#, 401).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert_eq!(err.message(), "invalid key");
    }

    #[test]
    fn test_other_status_maps_to_api_error() {
        let err = interpret(r#"{"error": {"message": "not here"}}"#, 404).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.message(), "not here");
    }

    #[test]
    fn test_missing_error_object() {
        let err = interpret(r#"{"detail": "crash"}"#, 500).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);
        assert!(err.message().contains(r#"{"detail": "crash"}"#));
        assert!(err.message().contains("500"));
    }

    #[test]
    fn test_non_object_body_on_failure() {
        let err = interpret("[1, 2]", 503).unwrap_err();
        assert!(err.message().starts_with("Invalid response object from API"));
    }

    #[test]
    fn test_mistyped_fields_keep_status_mapping() {
        let err = interpret(r#"{"error": {"message": "bad param", "param": ["a", "b"]}}"#, 400)
            .unwrap_err();
        match err {
            ApiError::InvalidRequest { message, param, .. } => {
                assert_eq!(message, "bad param");
                assert!(param.is_none());
            }
            other => panic!("Expected invalid request error, got {:?}", other),
        }

        let err = interpret(r#"{"error": {"message": "invalid key", "code": false}}"#, 401).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert_eq!(err.message(), "invalid key");
    }

    #[test]
    fn test_non_object_error_is_malformed() {
        let err = interpret(r#"{"error": "oops"}"#, 400).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);
        assert!(err.message().starts_with("Invalid response object from API"));
    }

    /// Log lines written while `f` runs
    fn captured_logs(f: impl FnOnce()) -> String {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || LogBuffer(writer.clone()))
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = buffer.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_authentication_failure_logs_no_details() {
        let logs = captured_logs(|| {
            let body = r#"{"error": {"code": "auth", "message": "key sk_live_SECRET revoked"}}"#;
            assert!(interpret(body, 401).is_err());
        });
        assert!(logs.contains("authentication failed"));
        assert!(logs.contains("401"));
        assert!(!logs.contains("sk_live_SECRET"));
        assert!(!logs.contains("auth\""));
    }

    #[test]
    fn test_other_failures_log_details() {
        let logs = captured_logs(|| {
            let body = r#"{"error": {"code": "x", "message": "bad param", "param": "id"}}"#;
            assert!(interpret(body, 400).is_err());
        });
        assert!(logs.contains("Qonversion API error received"));
        assert!(logs.contains("error_message=\"bad param\""));
        assert!(logs.contains("param=\"id\""));
    }

    #[test]
    fn test_missing_message_uses_fallback() {
        let err = interpret(r#"{"error": {"code": "x"}}"#, 400).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
        assert_eq!(err.message(), "API request failed with HTTP status 400");
    }
}
