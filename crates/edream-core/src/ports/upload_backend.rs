//! Upload-session backend port.
//!
//! The transfer engine talks to the backend only through these three
//! operations. The HTTP implementation lives in `edream-api`.

use async_trait::async_trait;
use serde_json::Value;

use super::error::BackendResult;
use crate::domain::{CompletedPart, MediaRecord, ResourceType, UploadFields};

/// What is being uploaded and where it attaches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    /// Resource type of the upload.
    pub resource_type: ResourceType,
    /// Existing record to attach to, if any.
    pub resource_id: Option<String>,
    /// File extension without the leading dot.
    pub extension: String,
    /// Optional payload field values.
    pub fields: UploadFields,
}

/// Request to open a multipart upload session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUploadRequest {
    /// Upload target.
    pub target: UploadTarget,
    /// Number of parts the file is split into.
    pub total_parts: u32,
}

/// A freshly opened upload session.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedUpload {
    /// Backend-assigned upload id.
    pub upload_id: String,
    /// One presigned URL per part, in part order.
    pub urls: Vec<String>,
    /// Record created inline for primary-media uploads without a resource id.
    pub resource: Option<MediaRecord>,
    /// Raw response payload, for diagnosis.
    pub raw: Value,
}

/// Request for a new presigned URL for one part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshPartRequest {
    /// Resource type of the upload.
    pub resource_type: ResourceType,
    /// Record the upload is attached to.
    pub resource_id: String,
    /// Upload session id.
    pub upload_id: String,
    /// 1-based part number.
    pub part_number: u32,
    /// File extension without the leading dot.
    pub extension: String,
    /// Optional payload field values.
    pub fields: UploadFields,
}

/// Request to finalize an upload session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteUploadRequest {
    /// Resource type of the upload.
    pub resource_type: ResourceType,
    /// Record the upload is attached to.
    pub resource_id: String,
    /// Upload session id.
    pub upload_id: String,
    /// Every uploaded part, in ascending part order.
    pub parts: Vec<CompletedPart>,
    /// File extension without the leading dot.
    pub extension: String,
    /// Optional payload field values.
    pub fields: UploadFields,
}

/// Result of a completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    /// The created or updated record, when the response carried one.
    pub record: Option<MediaRecord>,
    /// Raw response payload, for diagnosis.
    pub raw: Value,
}

/// Port trait for upload-session backend operations.
///
/// # Design
///
/// - Uses core-owned DTOs, not backend wire types
/// - Returns `BackendError` for all failures
/// - Never retries; retry policy belongs to the caller
#[async_trait]
pub trait UploadBackendPort: Send + Sync {
    /// Open an upload session and obtain one presigned URL per part.
    async fn create_upload_session(
        &self,
        request: &CreateUploadRequest,
    ) -> BackendResult<CreatedUpload>;

    /// Obtain a fresh presigned URL for one part.
    async fn refresh_part_url(&self, request: &RefreshPartRequest) -> BackendResult<String>;

    /// Stitch the uploaded parts into the final object.
    async fn complete_upload_session(
        &self,
        request: &CompleteUploadRequest,
    ) -> BackendResult<CompletionResponse>;
}
