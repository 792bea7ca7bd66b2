//! Error types for backend port operations.

use thiserror::Error;

/// Errors from upload-session backend operations.
///
/// These are domain-level errors that the transfer engine can act on.
/// Implementation-specific errors (HTTP, JSON) are mapped to these by the
/// adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The backend does not accept this resource type for the operation.
    #[error("Invalid resource type: {resource_type}")]
    InvalidResourceType {
        /// The rejected resource type
        resource_type: String,
    },

    /// The request payload was rejected.
    #[error("Validation failed: {message}")]
    ValidationFailed {
        /// Backend-provided reason
        message: String,
    },

    /// The upload session no longer exists or its URLs can no longer be issued.
    #[error("Upload session expired: {upload_id}")]
    UploadSessionExpired {
        /// The expired upload id
        upload_id: String,
    },

    /// The target resource or session was not found.
    #[error("Not found: {what}")]
    NotFound {
        /// What was not found
        what: String,
    },

    /// The submitted parts do not match the session.
    #[error("Submitted parts do not match the upload session: {message}")]
    PartMismatch {
        /// Backend-provided reason
        message: String,
    },

    /// Missing or rejected credentials.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Backend-provided reason
        message: String,
    },

    /// The response could not be interpreted.
    #[error("Malformed backend response: {message}")]
    MalformedResponse {
        /// What was wrong
        message: String,
        /// Raw response body, for diagnosis
        raw: String,
    },

    /// Network or connectivity error.
    #[error("Network error: {message}")]
    Network {
        /// Description of the network error
        message: String,
    },

    /// Client-side configuration error (bad base URL and similar).
    #[error("Configuration error: {message}")]
    Configuration {
        /// What's wrong with the configuration
        message: String,
    },

    /// Any other non-success status.
    #[error("Backend returned status {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Backend-provided message
        message: String,
    },
}

impl BackendError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }

    /// Create a malformed-response error carrying the raw body.
    pub fn malformed(message: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
            raw: raw.into(),
        }
    }
}

/// Result type alias for backend port operations.
pub type BackendResult<T> = Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BackendError::UploadSessionExpired {
            upload_id: "upl-1".to_string(),
        };
        assert!(err.to_string().contains("upl-1"));

        let err = BackendError::Api {
            status: 502,
            message: "bad gateway".to_string(),
        };
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_malformed_keeps_raw_body() {
        let err = BackendError::malformed("missing uploadId", "{\"urls\":[]}");
        match err {
            BackendError::MalformedResponse { raw, .. } => assert_eq!(raw, "{\"urls\":[]}"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
