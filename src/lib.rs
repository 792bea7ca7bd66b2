//! # edream-sdk
//!
//! Client SDK for the e-dream media backend.
//!
//! [`EdreamClient`] wires the backend REST adapter (`edream-api`) to the
//! chunked transfer engine (`edream-transfer`). Large files are uploaded in
//! parts to presigned object-storage URLs; downloads are streamed to disk.
//!
//! ```no_run
//! use edream_sdk::{EdreamClient, ResourceType, UploadOptions};
//! use std::path::Path;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = EdreamClient::from_env()?;
//! let outcome = client
//!     .upload_file(
//!         Path::new("python_video.mp4"),
//!         ResourceType::PrimaryMedia,
//!         &UploadOptions::new().with_nsfw(false),
//!     )
//!     .await?;
//! println!("{:?}", outcome.record().map(|r| &r.uuid));
//! # Ok(())
//! # }
//! ```
//!
//! The workspace crates can also be used directly:
//!
//! - `edream_core` - domain types and ports
//! - `edream_api` - backend adapter implementing [`UploadBackendPort`]
//! - `edream_transfer` - the upload and download engine

mod client;
mod error;

pub use client::EdreamClient;
pub use error::SdkError;

// =============================================================================
// Workspace Crate Re-exports
// =============================================================================

pub use edream_core::{
    BackendError, CompletedPart, MediaKind, MediaRecord, NoopProgressReporter, ProgressError,
    ProgressFn, ProgressReporter, ResourceType, SessionStatus, TransferProgress,
    UploadBackendPort, UploadOptions,
};

pub use edream_api::{API_KEY_ENV, ApiClientConfig, BACKEND_URL_ENV, ConfigError, DefaultApiClient};

pub use edream_transfer::{
    DownloadError, DownloadOptions, PartFailure, TransferConfig, TransferConfigError,
    UploadCoordinator, UploadError, UploadOutcome,
};

/// Re-export of edream-core for callers implementing their own ports.
pub mod core_types {
    pub use edream_core::*;
}

/// Re-export of the transfer engine for custom transports.
pub mod transfer {
    pub use edream_transfer::*;
}
