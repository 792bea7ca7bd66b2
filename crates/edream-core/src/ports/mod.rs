//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the transfer engine expects from the backend
//! and from the caller. They contain no implementation details and use only
//! domain types.
//!
//! # Design Rules
//!
//! - No `reqwest` types in any signature
//! - Backend failures are reported as [`BackendError`], never as HTTP errors
//! - Progress reporting is a capability object, not a bare function pointer

mod error;
mod progress;
mod upload_backend;

pub use error::{BackendError, BackendResult};
pub use progress::{
    NoopProgressReporter, ProgressError, ProgressFn, ProgressReporter, TransferProgress,
};
pub use upload_backend::{
    CompleteUploadRequest, CompletionResponse, CreateUploadRequest, CreatedUpload,
    RefreshPartRequest, UploadBackendPort, UploadTarget,
};
