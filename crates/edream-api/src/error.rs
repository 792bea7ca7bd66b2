//! Internal error types for backend API operations.
//!
//! These errors are internal to `edream-api` and are mapped to
//! [`edream_core::BackendError`] at the port boundary.

use thiserror::Error;

/// Result type alias for backend API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors related to backend API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request failed with an HTTP error status.
    #[error("Backend request failed with status {status}: {url}: {message}")]
    ApiRequestFailed {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
        /// Message extracted from the error envelope (or the raw body)
        message: String,
    },

    /// The envelope reported `success: false` on a 2xx response.
    #[error("Backend rejected the request: {message}")]
    Rejected {
        /// Backend-provided message
        message: String,
    },

    /// API returned an invalid or unexpected response.
    #[error("Invalid response from backend: {message}")]
    InvalidResponse {
        /// Description of what was invalid
        message: String,
        /// Raw response payload
        raw: String,
    },

    /// The operation needs a resource id that was not supplied.
    #[error("Resource id required for {resource_type} uploads")]
    MissingResourceId {
        /// Wire name of the resource type
        resource_type: &'static str,
    },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl ApiError {
    /// Create an invalid-response error from a payload.
    pub fn invalid_response(message: impl Into<String>, raw: &serde_json::Value) -> Self {
        Self::InvalidResponse {
            message: message.into(),
            raw: raw.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_request_failed_error_message() {
        let error = ApiError::ApiRequestFailed {
            status: 404,
            url: "https://api.example.com/dream/abc/create-multipart-upload".to_string(),
            message: "Dream not found".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("Dream not found"));
    }

    #[test]
    fn test_invalid_response_keeps_raw() {
        let error = ApiError::invalid_response("missing uploadId", &json!({"urls": []}));
        match error {
            ApiError::InvalidResponse { raw, .. } => assert_eq!(raw, r#"{"urls":[]}"#),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_missing_resource_id_message() {
        let error = ApiError::MissingResourceId {
            resource_type: "thumbnail",
        };
        assert!(error.to_string().contains("thumbnail"));
    }
}
