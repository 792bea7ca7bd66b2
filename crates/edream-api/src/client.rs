//! e-dream backend client.

use crate::config::{ApiClientConfig, ConfigError};
use crate::http::{HttpBackend, ReqwestBackend};

// ============================================================================
// Type Aliases
// ============================================================================

/// Default backend client using the reqwest HTTP backend.
pub type DefaultApiClient = ApiClient<ReqwestBackend>;

// ============================================================================
// Client
// ============================================================================

/// Client for the upload-session endpoints of the e-dream API.
///
/// Generic over an HTTP backend so it can be tested against a fake. Use
/// [`DefaultApiClient`] and interact with it through
/// [`edream_core::UploadBackendPort`].
pub struct ApiClient<B: HttpBackend> {
    pub(crate) backend: B,
}

impl DefaultApiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: &ApiClientConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            backend: ReqwestBackend::new(config)?,
        })
    }

    /// Create a client from `EDREAM_BACKEND_URL` and `EDREAM_API_KEY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(&ApiClientConfig::from_env()?)
    }
}

impl<B: HttpBackend> ApiClient<B> {
    /// Create a new client with a custom backend.
    #[cfg(test)]
    pub(crate) const fn with_backend(backend: B) -> Self {
        Self { backend }
    }
}
