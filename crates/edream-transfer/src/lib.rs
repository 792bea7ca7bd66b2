//! Chunked multipart upload and streamed download engine.
//!
//! Uploads split a file into fixed-size parts, `PUT` each part to a
//! presigned URL issued by the backend, retry failed parts with a freshly
//! issued URL, and finally ask the backend to stitch the parts together.
//! Downloads stream a URL to disk through a bounded buffer.
//!
//! # Structure
//!
//! - `planner` - part count and byte ranges
//! - `uploader` - one part `PUT`, returning the unquoted ETag
//! - `session` - the create / upload parts / complete state machine
//! - `download` - streamed `GET` to a file
//! - `coordinator` - validation and entry points
//! - `transport` - object-storage HTTP abstraction and its reqwest implementation
//! - `progress` - throttled progress reporting
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod config;
mod coordinator;
mod download;
mod error;
mod planner;
mod progress;
mod session;
mod transport;
mod uploader;

#[cfg(test)]
mod testing;

// ============================================================================
// Public API
// ============================================================================

pub use config::{
    DEFAULT_DOWNLOAD_BUFFER_SIZE, DEFAULT_MAX_ATTEMPTS, DEFAULT_PART_SIZE, TransferConfig,
    TransferConfigError,
};
pub use coordinator::UploadCoordinator;
pub use download::{DownloadOptions, DownloadStream, destination_from_url};
pub use error::{
    DownloadError, DownloadResult, PartFailure, TransportError, UploadError, UploadResult,
};
pub use planner::{PartPlan, PartSpan, total_parts};
pub use progress::{ProgressThrottle, ProgressTracker};
pub use session::{UploadOutcome, UploadSession};
pub use transport::{
    BodyStream, ByteStream, GetResponse, ObjectTransport, PutResponse, ReqwestTransport,
    UploadBody,
};
pub use uploader::{PartUploader, strip_etag_quotes};
