//! Pin model: a journal entry attached to a geographic point.

use serde::{Deserialize, Serialize};

use super::{Author, Comment};

/// Maximum number of photo payloads a pin may carry.
pub const MAX_PHOTOS: usize = 5;

/// A journaled geographic entry with metadata and comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pin {
    pub id: String,
    /// Latitude in [-90, 90]; immutable once set.
    pub lat: f64,
    /// Longitude in [-180, 180]; immutable once set.
    pub lng: f64,
    #[serde(default)]
    pub name: String,
    pub category: String,
    /// Display color resolved at creation time; never rewritten by later
    /// category-registry changes.
    pub color: String,
    /// Free-text description.
    #[serde(default)]
    pub comment: String,
    /// Opaque encoded images, at most [`MAX_PHOTOS`].
    #[serde(default)]
    pub photos: Vec<String>,
    /// Best-effort reverse-geocoded display name; may be empty.
    #[serde(default)]
    pub location_name: String,
    /// Snapshot of the creating user; pins created while logged out have none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    pub created_at: String,
    /// Insertion order is display order; append-only except for like toggling.
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// Unsaved location context between map click and confirm/cancel.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingLocation {
    pub lat: f64,
    pub lng: f64,
    pub location_name: String,
}

/// Details for a new pin as gathered by the creation form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPin {
    #[serde(default)]
    pub name: String,
    pub category: String,
    /// Non-empty when the user typed a brand-new category instead of
    /// picking one from the dropdown.
    #[serde(default)]
    pub custom_category: Option<String>,
    /// Color chosen by the creator; overridden for built-in categories.
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub photos: Vec<String>,
}

/// Partial field update for an existing pin.
///
/// Identity, location, authorship, and comments are never patchable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub photos: Option<Vec<String>>,
}

impl PinPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.color.is_none()
            && self.comment.is_none()
            && self.photos.is_none()
    }
}
