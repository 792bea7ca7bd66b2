//! HTTP backend abstraction for the e-dream API.
//!
//! Every upload-session call is a JSON `POST` relative to the configured base
//! URL. The trait exists so the client can be exercised against a fake in
//! tests. Requests are never retried here; a repeated create would open a
//! second session.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::{ApiClientConfig, ConfigError};
use crate::error::{ApiError, ApiResult};

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Trait for HTTP backends that can post JSON to API paths.
///
/// This is an implementation detail - external code should use the
/// `UploadBackendPort` trait.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// Post `body` to `path` and return the parsed JSON response.
    async fn post_json(&self, path: &str, body: &Value) -> ApiResult<Value>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest.
pub struct ReqwestBackend {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestBackend {
    /// Create a new reqwest backend with the given configuration.
    pub fn new(config: &ApiClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Api-Key {}", config.api_key.trim()))
            .map_err(|e| ConfigError::HttpClient {
                message: format!("invalid API key header: {e}"),
            })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|e| ConfigError::HttpClient {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        Ok(Url::parse(&join_url(&self.base_url, path))?)
    }
}

/// Join a base URL and an absolute API path with exactly one slash.
fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Pull the `message` field out of an error envelope, or fall back to the body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn post_json(&self, path: &str, body: &Value) -> ApiResult<Value> {
        let url = self.endpoint(path)?;
        debug!(url = %url, "POST");

        let response = self.client.post(url.clone()).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::ApiRequestFailed {
                status: status.as_u16(),
                url: url.to_string(),
                message: error_message(&text),
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| ApiError::InvalidResponse {
            message: format!("response is not JSON: {e}"),
            raw: text,
        })
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================
