//! Resource types and their backend endpoint profiles.
//!
//! Every upload targets one of four resource types. Each type has a static
//! [`ResourceProfile`] that supplies the three endpoint templates of an upload
//! session (create, refresh, complete) and the optional fields each request
//! carries. Callers look the profile up instead of branching on the type.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of resource a file is uploaded as.
///
/// Serialized with the backend's wire names (`dream`, `thumbnail`,
/// `filmstrip`, `keyframe`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    /// The primary video or image of a dream.
    #[serde(rename = "dream")]
    PrimaryMedia,
    /// Thumbnail image of an existing dream.
    #[serde(rename = "thumbnail")]
    Thumbnail,
    /// One numbered filmstrip frame of an existing dream.
    #[serde(rename = "filmstrip")]
    FilmstripFrame,
    /// Image attached to an existing keyframe.
    #[serde(rename = "keyframe")]
    KeyframeImage,
}

impl ResourceType {
    /// All resource types, in wire-name order.
    pub const ALL: [Self; 4] = [
        Self::PrimaryMedia,
        Self::Thumbnail,
        Self::FilmstripFrame,
        Self::KeyframeImage,
    ];

    /// Wire name used in request payloads.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PrimaryMedia => "dream",
            Self::Thumbnail => "thumbnail",
            Self::FilmstripFrame => "filmstrip",
            Self::KeyframeImage => "keyframe",
        }
    }

    /// Endpoint and payload profile for this resource type.
    pub const fn profile(self) -> &'static ResourceProfile {
        match self {
            Self::PrimaryMedia => &PRIMARY_MEDIA,
            Self::Thumbnail => &THUMBNAIL,
            Self::FilmstripFrame => &FILMSTRIP_FRAME,
            Self::KeyframeImage => &KEYFRAME_IMAGE,
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown resource type name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid resource type: '{value}' (expected one of dream, thumbnail, filmstrip, keyframe)")]
pub struct ResourceTypeParseError {
    /// The rejected input.
    pub value: String,
}

impl FromStr for ResourceType {
    type Err = ResourceTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ResourceTypeParseError {
                value: s.to_string(),
            })
    }
}

bitflags! {
    /// Optional fields a request payload may carry.
    ///
    /// Fields that are always present for a phase (upload id, part number,
    /// extension, parts list) are not represented here.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[repr(transparent)]
    pub struct PayloadFields: u8 {
        /// Resource type wire name (`type`).
        const TYPE         = 0b0000_0001;
        /// Display name of the created record (`name`).
        const NAME         = 0b0000_0010;
        /// Adult-content flag (`nsfw`).
        const NSFW         = 0b0000_0100;
        /// Media is already finalized (`processed`).
        const PROCESSED    = 0b0000_1000;
        /// Filmstrip frame index (`frameNumber`).
        const FRAME_NUMBER = 0b0001_0000;
    }
}

/// Path template with a single `{id}` placeholder for the resource id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointTemplate(&'static str);

impl EndpointTemplate {
    /// Wrap a static template.
    pub const fn new(template: &'static str) -> Self {
        Self(template)
    }

    /// The raw template string.
    pub const fn template(self) -> &'static str {
        self.0
    }

    /// Substitute the resource id into the template.
    pub fn render(self, resource_id: &str) -> String {
        self.0.replace("{id}", resource_id)
    }
}

/// Static description of how one resource type maps onto the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceProfile {
    /// The resource type this profile describes.
    pub resource_type: ResourceType,
    /// Session-creation endpoint when attaching to an existing record.
    pub create: EndpointTemplate,
    /// Session-creation endpoint when the backend creates the record inline.
    ///
    /// `None` means the type can only attach to an existing record.
    pub create_unattached: Option<&'static str>,
    /// Part URL refresh endpoint.
    pub refresh: EndpointTemplate,
    /// Session completion endpoint.
    pub complete: EndpointTemplate,
    /// Optional fields sent when creating the session.
    pub create_fields: PayloadFields,
    /// Optional fields sent when refreshing a part URL.
    pub refresh_fields: PayloadFields,
    /// Optional fields sent when completing the session.
    pub complete_fields: PayloadFields,
    /// Uploads of this type require a frame number.
    pub requires_frame_number: bool,
    /// Completion returns the updated media record (otherwise a success flag).
    pub returns_record: bool,
}

impl ResourceProfile {
    /// Whether a resource id must be supplied up front.
    pub const fn requires_resource_id(&self) -> bool {
        self.create_unattached.is_none()
    }

    /// Resolve the session-creation path.
    ///
    /// Returns `None` when no id is given and the type cannot create its
    /// record inline.
    pub fn create_path(&self, resource_id: Option<&str>) -> Option<String> {
        match resource_id {
            Some(id) => Some(self.create.render(id)),
            None => self.create_unattached.map(str::to_string),
        }
    }
}

const DREAM_EXTRAS: PayloadFields = PayloadFields::NAME
    .union(PayloadFields::NSFW)
    .union(PayloadFields::PROCESSED);

static PRIMARY_MEDIA: ResourceProfile = ResourceProfile {
    resource_type: ResourceType::PrimaryMedia,
    create: EndpointTemplate::new("/dream/{id}/create-multipart-upload"),
    create_unattached: Some("/dream/create-multipart-upload"),
    refresh: EndpointTemplate::new("/dream/{id}/refresh-multipart-upload"),
    complete: EndpointTemplate::new("/dream/{id}/complete-multipart-upload"),
    create_fields: PayloadFields::TYPE.union(DREAM_EXTRAS),
    refresh_fields: PayloadFields::TYPE.union(PayloadFields::PROCESSED),
    complete_fields: PayloadFields::TYPE.union(DREAM_EXTRAS),
    requires_frame_number: false,
    returns_record: true,
};

static THUMBNAIL: ResourceProfile = ResourceProfile {
    resource_type: ResourceType::Thumbnail,
    create: EndpointTemplate::new("/dream/{id}/create-multipart-upload"),
    create_unattached: None,
    refresh: EndpointTemplate::new("/dream/{id}/refresh-multipart-upload"),
    complete: EndpointTemplate::new("/dream/{id}/complete-multipart-upload"),
    create_fields: PayloadFields::TYPE,
    refresh_fields: PayloadFields::TYPE,
    complete_fields: PayloadFields::TYPE,
    requires_frame_number: false,
    returns_record: true,
};

static FILMSTRIP_FRAME: ResourceProfile = ResourceProfile {
    resource_type: ResourceType::FilmstripFrame,
    create: EndpointTemplate::new("/dream/{id}/create-multipart-upload"),
    create_unattached: None,
    refresh: EndpointTemplate::new("/dream/{id}/refresh-multipart-upload"),
    complete: EndpointTemplate::new("/dream/{id}/complete-multipart-upload"),
    create_fields: PayloadFields::TYPE.union(PayloadFields::FRAME_NUMBER),
    refresh_fields: PayloadFields::TYPE.union(PayloadFields::FRAME_NUMBER),
    complete_fields: PayloadFields::TYPE.union(PayloadFields::FRAME_NUMBER),
    requires_frame_number: true,
    returns_record: true,
};

static KEYFRAME_IMAGE: ResourceProfile = ResourceProfile {
    resource_type: ResourceType::KeyframeImage,
    create: EndpointTemplate::new("/keyframe/{id}/image/init"),
    create_unattached: None,
    refresh: EndpointTemplate::new("/keyframe/{id}/image/refresh"),
    complete: EndpointTemplate::new("/keyframe/{id}/image/complete"),
    create_fields: PayloadFields::empty(),
    refresh_fields: PayloadFields::TYPE,
    complete_fields: PayloadFields::TYPE,
    requires_frame_number: false,
    returns_record: false,
};
