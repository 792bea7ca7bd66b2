//! Error types for the transfer engine.

use std::io;
use std::path::PathBuf;

use edream_core::{BackendError, ResourceType, ResourceTypeParseError, SessionStateError};
use thiserror::Error;

/// Failure talking to object storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request could not be sent or the connection failed.
    #[error("Request failed: {message}")]
    Request { message: String },

    /// The response body broke off mid-stream.
    #[error("Body stream failed: {message}")]
    Body { message: String },

    /// The request timed out.
    #[error("Request timed out")]
    Timeout,
}

/// Why one attempt at uploading a part failed.
///
/// Returned rather than raised so the session decides the retry policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartFailure {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Storage answered with status {status}")]
    Status { status: u16 },

    #[error("Storage response carried no ETag")]
    MissingEtag,
}

/// Errors surfaced by an upload call.
#[derive(Debug, Error)]
pub enum UploadError {
    /// A backend session call failed. Never retried.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// A part failed on every attempt; no completion was sent.
    #[error("Part {part_number} failed after {attempts} attempts: {last_failure}")]
    PartFailed {
        part_number: u32,
        attempts: u32,
        #[source]
        last_failure: PartFailure,
    },

    /// The backend answered without the data the upload needs.
    #[error("Malformed backend response: {message}")]
    MalformedResponse { message: String, raw: String },

    /// The resource type needs an option the caller did not set.
    #[error("{resource_type} uploads require the {option} option")]
    MissingOption {
        option: &'static str,
        resource_type: ResourceType,
    },

    /// The file needs more parts than a part number can address.
    #[error("A {file_size}-byte file needs more than u32::MAX parts of {part_size} bytes")]
    TooManyParts { file_size: u64, part_size: u64 },

    /// The upload source is not a readable file.
    #[error("Cannot upload {path}: {message}")]
    InvalidFile { path: PathBuf, message: String },

    /// Session bookkeeping rejected a step.
    #[error("Upload session state error: {0}")]
    Session(#[from] SessionStateError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<ResourceTypeParseError> for UploadError {
    fn from(err: ResourceTypeParseError) -> Self {
        Self::Backend(BackendError::InvalidResourceType {
            resource_type: err.value,
        })
    }
}

/// Result type for upload operations.
pub type UploadResult<T> = Result<T, UploadError>;

/// Errors surfaced by a download.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Download failed with status {status}")]
    Status { status: u16 },

    /// No destination was given and none can be derived from the URL.
    #[error("Cannot derive a file name from {url}")]
    NoDestination { url: String },

    /// The response was 2xx but nothing was written.
    #[error("Downloaded file {path} is empty")]
    Empty { path: PathBuf },

    /// The written size disagrees with the announced content length.
    #[error("Downloaded {actual} bytes, expected {expected}")]
    SizeMismatch { expected: u64, actual: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl DownloadError {
    /// Whether re-driving the same download may succeed.
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::SizeMismatch { .. } | Self::Empty { .. } => true,
            Self::Status { status } => *status >= 500 || *status == 408 || *status == 429,
            Self::NoDestination { .. } | Self::Io(_) => false,
        }
    }
}

/// Result type for download operations.
pub type DownloadResult<T> = Result<T, DownloadError>;
