//! Media type detection from file extensions.

use std::path::Path;

use serde::{Deserialize, Serialize};

const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "webp", "tiff", "svg", "ico", "heif", "heic",
];

const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "avi", "mov", "wmv", "mkv", "flv", "mpeg", "webm", "ogv", "3gp", "3g2", "h264",
    "hevc", "divx", "xvid", "avchd",
];

/// Broad media category of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Still image.
    Image,
    /// Video.
    Video,
}

impl MediaKind {
    /// Detect the media kind from an extension, with or without a leading dot.
    ///
    /// Unknown extensions are treated as video.
    pub fn from_extension(extension: &str) -> Self {
        let clean = normalize(extension);
        if IMAGE_EXTENSIONS.contains(&clean.as_str()) {
            Self::Image
        } else {
            Self::Video
        }
    }

    /// Whether the extension is one of the recognised media extensions.
    pub fn is_known_extension(extension: &str) -> bool {
        let clean = normalize(extension);
        IMAGE_EXTENSIONS.contains(&clean.as_str()) || VIDEO_EXTENSIONS.contains(&clean.as_str())
    }
}

fn normalize(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_ascii_lowercase()
}

/// `Content-Type` header value for a part PUT, derived from the extension.
pub fn content_type_for_extension(extension: &str) -> &'static str {
    match normalize(extension).as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "tiff" => "image/tiff",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "heif" => "image/heif",
        "heic" => "image/heic",
        "mp4" => "video/mp4",
        "avi" => "video/x-msvideo",
        "mov" => "video/quicktime",
        "wmv" => "video/x-ms-wmv",
        "mkv" => "video/x-matroska",
        "flv" => "video/x-flv",
        "mpeg" => "video/mpeg",
        "webm" => "video/webm",
        "ogv" => "video/ogg",
        "3gp" => "video/3gpp",
        "3g2" => "video/3gpp2",
        "h264" => "video/h264",
        "hevc" => "video/h265",
        _ => "application/octet-stream",
    }
}

/// File extension without the leading dot (empty when absent).
pub fn file_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// File name without its extension (empty when absent).
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
