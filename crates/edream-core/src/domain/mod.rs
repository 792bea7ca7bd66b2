//! Domain types for media uploads.
//!
//! These types are transport-agnostic: they describe what is being uploaded
//! and where it attaches, not how bytes move over the wire.

mod media;
mod options;
mod part;
mod record;
mod resource;
mod session;

pub use media::{MediaKind, content_type_for_extension, file_extension, file_stem};
pub use options::{DEFAULT_PROGRESS_INTERVAL, UploadFields, UploadOptions};
pub use part::CompletedPart;
pub use record::MediaRecord;
pub use resource::{
    EndpointTemplate, PayloadFields, ResourceProfile, ResourceType, ResourceTypeParseError,
};
pub use session::{SessionState, SessionStateError, SessionStatus};
