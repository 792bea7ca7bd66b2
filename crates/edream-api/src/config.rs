//! Public configuration for the backend client.
//!
//! This module provides a stable public API for configuring the client.

use std::env;
use std::time::Duration;

use thiserror::Error;

/// Environment variable holding the backend base URL.
pub const BACKEND_URL_ENV: &str = "EDREAM_BACKEND_URL";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "EDREAM_API_KEY";

/// Errors raised while building a client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required environment variable is unset or empty.
    #[error("Environment variable {name} must be set")]
    MissingEnv {
        /// Variable name
        name: &'static str,
    },

    /// The base URL does not parse.
    #[error("Invalid backend URL '{url}': {message}")]
    InvalidBaseUrl {
        /// The rejected URL
        url: String,
        /// Parser message
        message: String,
    },

    /// The API key is empty.
    #[error("API key must not be empty")]
    EmptyApiKey,

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {message}")]
    HttpClient {
        /// Builder message
        message: String,
    },
}

/// Configuration for the backend client.
///
/// # Example
///
/// ```
/// use edream_api::ApiClientConfig;
/// use std::time::Duration;
///
/// let config = ApiClientConfig::new("https://api-stage.infinidream.ai/api/v1", "my-key")
///     .with_timeout(Duration::from_secs(60))
///     .with_user_agent("my-app/1.0");
/// assert_eq!(config.base_url(), "https://api-stage.infinidream.ai/api/v1");
/// ```
#[derive(Clone)]
pub struct ApiClientConfig {
    /// Base URL every endpoint path is appended to
    pub(crate) base_url: String,
    /// API key sent as `Authorization: Api-Key <key>`
    pub(crate) api_key: String,
    /// Request timeout
    pub(crate) timeout: Duration,
    /// User agent string for HTTP requests
    pub(crate) user_agent: String,
}

impl ApiClientConfig {
    /// Create a configuration for the given backend and key.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(30),
            user_agent: concat!("edream-sdk/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Read the base URL and API key from `EDREAM_BACKEND_URL` and `EDREAM_API_KEY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = read_env(BACKEND_URL_ENV)?;
        let api_key = read_env(API_KEY_ENV)?;
        Ok(Self::new(base_url, api_key))
    }

    /// Set the request timeout.
    ///
    /// Defaults to 30 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string for HTTP requests.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The configured request timeout.
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Check that the URL parses and the key is present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            message: e.to_string(),
        })?;
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(())
    }
}

impl std::fmt::Debug for ApiClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

fn read_env(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingEnv { name }),
    }
}
