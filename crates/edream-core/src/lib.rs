//! Core domain types and port definitions for the e-dream SDK.
//!
//! This crate holds everything the transfer engine and the backend adapter
//! agree on, without depending on either of them:
//!
//! - `domain` - resource types and their endpoint profiles, upload options,
//!   parts, upload session state, media records, media-type detection
//! - `ports` - the backend upload-session port and the progress capability
//!
//! No HTTP client types appear in any public signature here.
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    CompletedPart, DEFAULT_PROGRESS_INTERVAL, EndpointTemplate, MediaKind, MediaRecord,
    PayloadFields, ResourceProfile, ResourceType, ResourceTypeParseError, SessionState,
    SessionStateError, SessionStatus, UploadFields, UploadOptions, content_type_for_extension,
    file_extension, file_stem,
};
pub use ports::{
    BackendError, BackendResult, CompleteUploadRequest, CompletionResponse, CreateUploadRequest,
    CreatedUpload, NoopProgressReporter, ProgressError, ProgressFn, ProgressReporter,
    RefreshPartRequest, TransferProgress, UploadBackendPort, UploadTarget,
};
