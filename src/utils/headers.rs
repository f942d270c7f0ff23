//! Outgoing header construction
//!
//! Builds the default header set for every API request: client identifiers,
//! bearer authorization and content type.

use crate::models::Headers;
use serde_json::{Map, Value};

/// API version advertised in the user agent
pub const API_VERSION: &str = "v3";

/// Header carrying the JSON client descriptor object
pub const CLIENT_USER_AGENT_HEADER: &str = "X-Qonversion-Client-User-Agent";

/// Content type of request bodies
pub const CONTENT_TYPE: &str = "application/json";

/// A best-effort producer of one client descriptor value
pub type DescriptorProducer = fn() -> Result<String, String>;

/// Platform descriptors reported in [`CLIENT_USER_AGENT_HEADER`]
pub fn platform_descriptors() -> Vec<(&'static str, DescriptorProducer)> {
    vec![
        ("lang_version", lang_version as DescriptorProducer),
        ("platform", platform as DescriptorProducer),
        ("uname", uname as DescriptorProducer),
        ("hostname", hostname as DescriptorProducer),
    ]
}

fn lang_version() -> Result<String, String> {
    option_env!("CARGO_PKG_RUST_VERSION")
        .filter(|v| !v.is_empty())
        .map(|v| format!("rust {}", v))
        .ok_or_else(|| "rust-version not declared".to_string())
}

fn platform() -> Result<String, String> {
    Ok(format!(
        "{}-{}-{}",
        std::env::consts::ARCH,
        std::env::consts::FAMILY,
        std::env::consts::OS
    ))
}

fn uname() -> Result<String, String> {
    std::fs::read_to_string("/proc/version")
        .map(|v| v.trim().to_string())
        .map_err(|e| e.to_string())
}

fn hostname() -> Result<String, String> {
    std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("COMPUTERNAME"))
        .map_err(|e| e.to_string())
}

/// Header values only carry visible ASCII
fn header_safe(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '?' })
        .collect()
}

/// Evaluate each descriptor independently
///
/// A failing producer is recorded as `"!! <error>"` for that descriptor only.
pub fn collect_descriptors(producers: &[(&'static str, DescriptorProducer)]) -> Map<String, Value> {
    let mut descriptors = Map::new();
    descriptors.insert("bindings_version".to_string(), Value::from(crate::VERSION));
    descriptors.insert("lang".to_string(), Value::from("rust"));
    descriptors.insert("publisher".to_string(), Value::from("qonversion"));

    for (name, producer) in producers {
        let value = match producer() {
            Ok(value) => value,
            Err(e) => format!("!! {}", e),
        };
        descriptors.insert((*name).to_string(), Value::from(header_safe(&value)));
    }
    descriptors
}

/// Default headers for a request authenticated with `api_key`
pub fn request_headers(api_key: &str) -> Headers {
    request_headers_with(api_key, &platform_descriptors())
}

/// [`request_headers`] with an explicit descriptor list
pub fn request_headers_with(api_key: &str, producers: &[(&'static str, DescriptorProducer)]) -> Headers {
    let mut headers = Headers::new();
    headers.insert(
        "User-Agent",
        format!("Qonversion/{} RustBindings/{}", API_VERSION, crate::VERSION),
    );
    headers.insert(
        CLIENT_USER_AGENT_HEADER,
        Value::Object(collect_descriptors(producers)).to_string(),
    );
    headers.insert("Authorization", format!("Bearer {}", api_key));
    headers.insert("Content-Type", CONTENT_TYPE);
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failing() -> Result<String, String> {
        Err("boom".to_string())
    }

    fn fixed() -> Result<String, String> {
        Ok("fixed".to_string())
    }

    #[test]
    fn test_default_headers() {
        let headers = request_headers("sk_test");
        assert_eq!(headers.get("authorization"), Some("Bearer sk_test"));
        assert_eq!(headers.get("content-type"), Some("application/json"));
        let user_agent = headers.get("user-agent").unwrap();
        assert!(user_agent.starts_with("Qonversion/v3 RustBindings/"));
        assert!(user_agent.ends_with(crate::VERSION));
    }

    #[test]
    fn test_client_user_agent_is_json() {
        let headers = request_headers("sk_test");
        let raw = headers.get(CLIENT_USER_AGENT_HEADER).unwrap();
        let value: Value = serde_json::from_str(raw).unwrap();
        assert_eq!(value["lang"], "rust");
        assert_eq!(value["publisher"], "qonversion");
        assert_eq!(value["bindings_version"], crate::VERSION);
        assert!(value["platform"].is_string());
    }

    #[test]
    fn test_failing_descriptor_is_isolated() {
        let descriptors = collect_descriptors(&[
            ("first", failing as DescriptorProducer),
            ("second", fixed as DescriptorProducer),
        ]);
        assert_eq!(descriptors["first"], "!! boom");
        assert_eq!(descriptors["second"], "fixed");
        assert_eq!(descriptors["lang"], "rust");
    }

    #[test]
    fn test_descriptor_values_are_header_safe() {
        assert_eq!(header_safe("host-é\n1"), "host-??1");
    }
}
