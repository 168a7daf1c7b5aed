//! Comment model attached to a single pin.

use serde::{Deserialize, Serialize};

use super::Author;

/// A comment on a pin.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub text: String,
    pub author: Author,
    pub created_at: String,
    /// Emails of users who liked this comment; no duplicates.
    #[serde(default)]
    pub likes: Vec<String>,
    /// Index of the comment this one replies to, within the same pin.
    ///
    /// Positional on purpose: comment deletion is unsupported, so indices
    /// stay stable for the pin's lifetime. If deletion is ever added,
    /// replies need stable ids instead.
    #[serde(default)]
    pub reply_to: Option<usize>,
}

/// Request shape for appending a comment to a pin.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub text: String,
    pub author: Author,
    #[serde(default)]
    pub reply_to: Option<usize>,
}
