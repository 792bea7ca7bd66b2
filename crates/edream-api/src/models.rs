//! Wire types for upload-session responses.
//!
//! These mirror the `data` member of the backend envelope and are converted
//! to core DTOs in `port.rs`.

use edream_core::MediaRecord;
use serde::Deserialize;

/// `data` of a create-multipart-upload response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUploadData {
    pub upload_id: String,
    pub urls: Vec<String>,
    /// Present when the backend created the record inline.
    #[serde(default)]
    pub dream: Option<MediaRecord>,
}

/// `data` of a refresh response: a single URL or a one-element list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RefreshUploadData {
    Single { url: String },
    Many { urls: Vec<String> },
}

impl RefreshUploadData {
    /// The refreshed URL, if the payload carried one.
    pub fn into_url(self) -> Option<String> {
        match self {
            Self::Single { url } => Some(url),
            Self::Many { urls } => urls.into_iter().next(),
        }
    }
}

/// `data` of a completion response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompleteUploadData {
    #[serde(default)]
    pub dream: Option<MediaRecord>,
}
