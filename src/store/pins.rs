//! Pin store: the authoritative pin collection and its mutation protocol.
//!
//! Every mutation applies in memory, emits a typed [`PinEvent`], and
//! persists the whole collection back to storage synchronously. When a
//! persist fails the in-memory state is deliberately not rolled back: the
//! in-session views keep showing the new state until the next reload, and
//! the storage error propagates to the caller for a user-facing alert.

use std::sync::mpsc::Receiver;
use std::sync::Arc;

use chrono::Utc;

use crate::errors::AppError;
use crate::models::{
    Author, Comment, NewComment, NewPin, PendingLocation, Pin, PinPatch, MAX_PHOTOS,
};
use crate::storage::{keys, Storage};
use crate::store::categories::CategoryRegistry;
use crate::store::events::{PinChange, PinEvent, Publisher};

/// Owns the authoritative list of pins.
pub struct PinStore {
    storage: Arc<dyn Storage>,
    pins: Vec<Pin>,
    revision: i64,
    publisher: Publisher<PinEvent>,
}

impl PinStore {
    /// Hydrate the pin collection from storage.
    pub fn open(storage: Arc<dyn Storage>) -> Self {
        let pins = read_pins(storage.as_ref());
        tracing::debug!("Hydrated {} pins", pins.len());
        Self {
            storage,
            pins,
            revision: 0,
            publisher: Publisher::new(),
        }
    }

    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    pub fn get(&self, id: &str) -> Option<&Pin> {
        self.pins.iter().find(|p| p.id == id)
    }

    /// Pins authored by the given email, for profile projections.
    pub fn by_author(&self, email: &str) -> Vec<&Pin> {
        self.pins
            .iter()
            .filter(|p| p.author.as_ref().is_some_and(|a| a.email == email))
            .collect()
    }

    /// Monotonic change counter, bumped once per mutation.
    pub fn revision(&self) -> i64 {
        self.revision
    }

    /// Register a subscriber for typed pin-changed events.
    pub fn subscribe(&mut self) -> Receiver<PinEvent> {
        self.publisher.subscribe()
    }

    /// Create a pin at a confirmed pending location.
    ///
    /// Allocates a unique id, stamps creation time, resolves the display
    /// color through the category registry, and embeds the author snapshot
    /// (or none when logged out). Location is immutable afterwards.
    pub fn create(
        &mut self,
        location: &PendingLocation,
        details: &NewPin,
        registry: &CategoryRegistry,
        author: Option<Author>,
    ) -> Result<Pin, AppError> {
        validate_coordinates(location.lat, location.lng)?;
        if details.photos.len() > MAX_PHOTOS {
            return Err(AppError::Validation(format!(
                "Maximum {} photos allowed",
                MAX_PHOTOS
            )));
        }

        let custom = details
            .custom_category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());
        let category = custom.unwrap_or(details.category.as_str()).to_string();
        let color = registry.resolve_color(
            &details.category,
            details.custom_category.as_deref(),
            &details.color,
        );

        let pin = Pin {
            id: uuid::Uuid::new_v4().to_string(),
            lat: location.lat,
            lng: location.lng,
            name: details.name.clone(),
            category,
            color,
            comment: details.comment.clone(),
            photos: details.photos.clone(),
            location_name: location.location_name.clone(),
            author,
            created_at: Utc::now().to_rfc3339(),
            comments: Vec::new(),
        };

        self.pins.push(pin.clone());
        self.bump(PinChange::Created { id: pin.id.clone() });
        self.persist()?;
        tracing::info!("Created pin {} at ({}, {})", pin.id, pin.lat, pin.lng);
        Ok(pin)
    }

    /// Apply a partial field update to the pin matching `id`.
    ///
    /// No-op when the pin is unknown. Never alters id, location, author, or
    /// comments.
    pub fn update(&mut self, id: &str, patch: &PinPatch) -> Result<(), AppError> {
        if let Some(photos) = &patch.photos {
            if photos.len() > MAX_PHOTOS {
                return Err(AppError::Validation(format!(
                    "Maximum {} photos allowed",
                    MAX_PHOTOS
                )));
            }
        }

        let Some(pin) = self.pins.iter_mut().find(|p| p.id == id) else {
            return Ok(());
        };

        if let Some(name) = &patch.name {
            pin.name = name.clone();
        }
        if let Some(category) = &patch.category {
            pin.category = category.clone();
        }
        if let Some(color) = &patch.color {
            pin.color = color.clone();
        }
        if let Some(comment) = &patch.comment {
            pin.comment = comment.clone();
        }
        if let Some(photos) = &patch.photos {
            pin.photos = photos.clone();
        }

        self.bump(PinChange::Updated { id: id.to_string() });
        self.persist()
    }

    /// Remove the pin matching `id`.
    ///
    /// Removal is unconditional: the author-only check is a view-layer
    /// affordance, and the trust boundary is the single browser tab.
    pub fn delete(&mut self, id: &str) -> Result<(), AppError> {
        let before = self.pins.len();
        self.pins.retain(|p| p.id != id);
        if self.pins.len() == before {
            return Err(AppError::NotFound(format!("Pin {} not found", id)));
        }

        self.bump(PinChange::Deleted { id: id.to_string() });
        self.persist()?;
        tracing::info!("Deleted pin {}", id);
        Ok(())
    }

    /// Append a comment to a pin's comment sequence.
    pub fn add_comment(&mut self, id: &str, comment: &NewComment) -> Result<usize, AppError> {
        let text = comment.text.trim();
        if text.is_empty() {
            return Err(AppError::Validation("Comment text is required".to_string()));
        }

        let Some(pin) = self.pins.iter_mut().find(|p| p.id == id) else {
            return Err(AppError::NotFound(format!("Pin {} not found", id)));
        };

        if let Some(reply_to) = comment.reply_to {
            if reply_to >= pin.comments.len() {
                return Err(AppError::Validation(format!(
                    "Reply target {} does not exist",
                    reply_to
                )));
            }
        }

        pin.comments.push(Comment {
            text: text.to_string(),
            author: comment.author.clone(),
            created_at: Utc::now().to_rfc3339(),
            likes: Vec::new(),
            reply_to: comment.reply_to,
        });
        let index = pin.comments.len() - 1;

        self.bump(PinChange::CommentAdded {
            id: id.to_string(),
            index,
        });
        self.persist()?;
        Ok(index)
    }

    /// Add `user_email` to the comment's like set if absent, else remove it.
    ///
    /// Toggling twice by the same user restores the original state. No-op
    /// when the pin or comment index does not exist.
    pub fn toggle_comment_like(
        &mut self,
        id: &str,
        comment_index: usize,
        user_email: &str,
    ) -> Result<(), AppError> {
        let Some(comment) = self
            .pins
            .iter_mut()
            .find(|p| p.id == id)
            .and_then(|p| p.comments.get_mut(comment_index))
        else {
            return Ok(());
        };

        if let Some(pos) = comment.likes.iter().position(|email| email == user_email) {
            comment.likes.remove(pos);
        } else {
            comment.likes.push(user_email.to_string());
        }

        self.bump(PinChange::CommentLikeToggled {
            id: id.to_string(),
            index: comment_index,
        });
        self.persist()
    }

    /// Rehydrate from storage (cross-tab storage-change signal).
    pub fn reload(&mut self) {
        self.pins = read_pins(self.storage.as_ref());
        self.bump(PinChange::Reloaded);
    }

    fn bump(&mut self, change: PinChange) {
        self.revision += 1;
        self.publisher.emit(PinEvent {
            revision: self.revision,
            change,
        });
    }

    fn persist(&self) -> Result<(), AppError> {
        let raw = serde_json::to_string(&self.pins)?;
        self.storage.set(keys::PINS, &raw)
    }
}

fn read_pins(storage: &dyn Storage) -> Vec<Pin> {
    storage
        .get(keys::PINS)
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default()
}

fn validate_coordinates(lat: f64, lng: f64) -> Result<(), AppError> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(AppError::Validation(format!("Invalid latitude {}", lat)));
    }
    if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
        return Err(AppError::Validation(format!("Invalid longitude {}", lng)));
    }
    Ok(())
}
