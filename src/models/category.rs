//! Category model: a named, colored classification for pins.

use serde::{Deserialize, Serialize};

/// Fallback color used when nothing else resolves.
pub const DEFAULT_PIN_COLOR: &str = "#1976d2";

/// The fixed built-in category set (display name + color).
pub const BUILT_IN_CATEGORIES: [(&str, &str); 4] = [
    ("Food", "#e53935"),
    ("ViewPoint", "#3949ab"),
    ("Museum", "#00897b"),
    ("Other", "#fbc02d"),
];

/// A named style bucket, either built-in or user-defined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub name: String,
    pub color: String,
}

impl Category {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}
