//! Completed multipart upload parts.

use serde::{Deserialize, Serialize};

/// A successfully uploaded part, as submitted to the completion endpoint.
///
/// Serialized with the storage layer's field names (`ETag`, `PartNumber`).
/// The ETag never carries surrounding quote characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedPart {
    /// Opaque content fingerprint returned by object storage.
    #[serde(rename = "ETag")]
    pub etag: String,
    /// 1-based part index.
    #[serde(rename = "PartNumber")]
    pub part_number: u32,
}

impl CompletedPart {
    /// Create a completed part entry.
    pub fn new(part_number: u32, etag: impl Into<String>) -> Self {
        Self {
            etag: etag.into(),
            part_number,
        }
    }
}
