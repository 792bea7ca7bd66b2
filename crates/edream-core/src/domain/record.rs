//! Media records returned by the backend.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A dream record as returned by upload session endpoints.
///
/// Only the fields the upload flow relies on are typed; everything else the
/// backend sends is preserved in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRecord {
    /// Numeric database id.
    #[serde(default)]
    pub id: Option<i64>,
    /// Stable public identifier, used in endpoint paths.
    pub uuid: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Processing status (`none`, `queue`, `processing`, `failed`, `processed`).
    #[serde(default)]
    pub status: Option<String>,
    /// Processed video URL.
    #[serde(default)]
    pub video: Option<String>,
    /// Original upload URL.
    #[serde(default, rename = "original_video")]
    pub original_video: Option<String>,
    /// Thumbnail URL.
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// Filmstrip frame entries.
    #[serde(default)]
    pub filmstrip: Option<Vec<Value>>,
    /// Adult-content flag.
    #[serde(default)]
    pub nsfw: Option<bool>,
    /// Any other fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MediaRecord {
    /// Minimal record with only a uuid.
    pub fn with_uuid(uuid: impl Into<String>) -> Self {
        Self {
            id: None,
            uuid: uuid.into(),
            name: None,
            status: None,
            video: None,
            original_video: None,
            thumbnail: None,
            filmstrip: None,
            nsfw: None,
            extra: Map::new(),
        }
    }
}
