//! User identity, credential, profile, and wishlist models.

use serde::{Deserialize, Serialize};

/// Immutable author snapshot embedded in pins and comments.
///
/// Later profile edits never rewrite these; the profile overlay supplies
/// current avatar/bio at render time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub name: String,
    pub email: String,
}

/// The current-session identity established by signup or login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl User {
    pub fn as_author(&self) -> Author {
        Author {
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// A registered account including its password, persisted in the users
/// collection and never exposed past the session store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Per-email profile overlay: current avatar and bio for rendering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// Encoded avatar image; empty when never set.
    #[serde(default)]
    pub profile_pic: String,
    #[serde(default)]
    pub description: String,
}

/// Visit status of a wishlist entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WishStatus {
    Pending,
    Visited,
}

impl WishStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WishStatus::Pending => "pending",
            WishStatus::Visited => "visited",
        }
    }
}

/// A place on a user's travel wishlist.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub id: String,
    pub place: String,
    #[serde(default)]
    pub description: String,
    pub status: WishStatus,
    pub created_at: String,
    #[serde(default)]
    pub visited_at: Option<String>,
}

/// Completion stats over a wishlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistStats {
    pub total: usize,
    pub pending: usize,
    pub visited: usize,
    /// Visited share in whole percent; 0 for an empty list.
    pub progress: u32,
}
