//! API requestor
//!
//! Resolves credentials, composes the request and hands it to the transport.
//! The transport's raw response is interpreted into an [`ApiResponse`] or an
//! [`ApiError`](crate::ApiError).

use super::interpreter::interpret_response;
use super::transport::{ReqwestTransport, Transport, TransportRequest};
use crate::config::ClientConfig;
use crate::models::{ApiResponse, Headers, HttpMethod, Params};
use crate::utils::error::{helpers, ApiResult};
use crate::utils::headers::request_headers;
use crate::utils::logging::body_for_log;
use crate::utils::url::{build_api_url, encode_params};
use anyhow::Result;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Client for the Qonversion REST API
#[derive(Clone)]
pub struct ApiRequestor {
    api_key: Option<String>,
    api_base: String,
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl ApiRequestor {
    /// Create a requestor using the default reqwest transport
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::with_options(config.timeout, config.retry.clone())?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a requestor with an injected transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let api_base = config.api_base.trim_end_matches('/').to_string();
        Self {
            api_key: None,
            api_base,
            config,
            transport,
        }
    }

    /// Use `api_key` instead of the configured key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Override the configured API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn transport_name(&self) -> &str {
        self.transport.name()
    }

    /// Send a request; `method` is `get`, `post` or `delete` in any case
    pub async fn request(
        &self,
        method: &str,
        url: &str,
        params: Option<Params>,
        headers: Option<Headers>,
    ) -> ApiResult<ApiResponse> {
        let api_key = self.resolve_api_key()?;
        let method = method.parse::<HttpMethod>()?;
        self.dispatch(api_key, method, url, params, headers).await
    }

    /// Send a request with an already typed verb
    pub async fn request_with(
        &self,
        method: HttpMethod,
        url: &str,
        params: Option<Params>,
        headers: Option<Headers>,
    ) -> ApiResult<ApiResponse> {
        let api_key = self.resolve_api_key()?;
        self.dispatch(api_key, method, url, params, headers).await
    }

    pub async fn get(&self, url: &str, params: Option<Params>) -> ApiResult<ApiResponse> {
        self.request_with(HttpMethod::Get, url, params, None).await
    }

    pub async fn post(&self, url: &str, params: Option<Params>) -> ApiResult<ApiResponse> {
        self.request_with(HttpMethod::Post, url, params, None).await
    }

    pub async fn delete(&self, url: &str, params: Option<Params>) -> ApiResult<ApiResponse> {
        self.request_with(HttpMethod::Delete, url, params, None).await
    }

    /// Instance key first, then the configured key
    fn resolve_api_key(&self) -> ApiResult<&str> {
        self.api_key
            .as_deref()
            .or(self.config.api_key.as_deref())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                warn!("Refusing to send request without an API key");
                helpers::missing_api_key_error()
            })
    }

    fn absolute_url(&self, url: &str) -> String {
        if url.is_empty() || url.starts_with('/') {
            format!("{}{}", self.api_base, url)
        } else {
            format!("{}/{}", self.api_base, url)
        }
    }

    async fn dispatch(
        &self,
        api_key: &str,
        method: HttpMethod,
        url: &str,
        params: Option<Params>,
        headers: Option<Headers>,
    ) -> ApiResult<ApiResponse> {
        let abs_url = self.absolute_url(url);

        let (abs_url, body) = if method.uses_query_params() {
            let query = params.as_ref().map(encode_params).unwrap_or_default();
            (build_api_url(&abs_url, &query), None)
        } else {
            (abs_url, Some(params.unwrap_or_default()))
        };

        let mut all_headers = request_headers(api_key);
        all_headers.merge(self.config.default_headers.clone());
        if let Some(headers) = headers {
            all_headers.merge(headers);
        }

        info!(method = method.as_str(), path = url, "API request");

        let response = self
            .transport
            .send(TransportRequest {
                method,
                url: abs_url,
                headers: all_headers,
                body,
            })
            .await?;

        debug!(
            status = response.status,
            body = %body_for_log(&response.body),
            "API response"
        );

        interpret_response(response.body, response.status, response.headers)
    }
}

impl fmt::Debug for ApiRequestor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiRequestor")
            .field("api_base", &self.api_base)
            .field("has_api_key", &(self.api_key.is_some() || self.config.api_key.is_some()))
            .field("transport", &self.transport.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requestor_creation() {
        let requestor = ApiRequestor::new(ClientConfig::with_api_key("sk_test"));
        assert!(requestor.is_ok());
        assert_eq!(requestor.unwrap().transport_name(), "reqwest");
    }

    #[test]
    fn test_absolute_url() {
        let requestor = ApiRequestor::new(ClientConfig::default())
            .unwrap()
            .with_api_base("https://api.test/v3/");
        assert_eq!(requestor.api_base(), "https://api.test/v3");
        assert_eq!(requestor.absolute_url("/users/u1"), "https://api.test/v3/users/u1");
        assert_eq!(requestor.absolute_url("users/u1"), "https://api.test/v3/users/u1");
        assert_eq!(requestor.absolute_url(""), "https://api.test/v3");
    }

    #[test]
    fn test_instance_key_wins() {
        let requestor = ApiRequestor::new(ClientConfig::with_api_key("sk_config"))
            .unwrap()
            .with_api_key("sk_instance");
        assert_eq!(requestor.resolve_api_key().unwrap(), "sk_instance");
    }

    #[test]
    fn test_debug_hides_key() {
        let requestor = ApiRequestor::new(ClientConfig::with_api_key("sk_secret")).unwrap();
        let debug = format!("{:?}", requestor);
        assert!(!debug.contains("sk_secret"));
        assert!(debug.contains("has_api_key: true"));
    }
}
