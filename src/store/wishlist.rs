//! Per-user travel wishlist store.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;

use crate::errors::AppError;
use crate::models::{WishStatus, WishlistItem, WishlistStats};
use crate::storage::{keys, Storage};

pub struct WishlistStore {
    storage: Arc<dyn Storage>,
    lists: HashMap<String, Vec<WishlistItem>>,
}

impl WishlistStore {
    pub fn open(storage: Arc<dyn Storage>) -> Self {
        let lists = read_lists(storage.as_ref());
        Self { storage, lists }
    }

    pub fn items(&self, email: &str) -> &[WishlistItem] {
        self.lists.get(email).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Items matching the status filter; `None` passes everything through.
    pub fn filtered(&self, email: &str, status: Option<WishStatus>) -> Vec<&WishlistItem> {
        self.items(email)
            .iter()
            .filter(|item| status.map_or(true, |s| item.status == s))
            .collect()
    }

    pub fn stats(&self, email: &str) -> WishlistStats {
        let items = self.items(email);
        let visited = items
            .iter()
            .filter(|i| i.status == WishStatus::Visited)
            .count();
        let total = items.len();
        WishlistStats {
            total,
            pending: total - visited,
            visited,
            progress: if total > 0 {
                ((visited as f64 / total as f64) * 100.0).round() as u32
            } else {
                0
            },
        }
    }

    /// Append a pending place to the user's wishlist.
    pub fn add(
        &mut self,
        email: &str,
        place: &str,
        description: &str,
    ) -> Result<WishlistItem, AppError> {
        let place = place.trim();
        if place.is_empty() {
            return Err(AppError::Validation("Place is required".to_string()));
        }

        let item = WishlistItem {
            id: uuid::Uuid::new_v4().to_string(),
            place: place.to_string(),
            description: description.trim().to_string(),
            status: WishStatus::Pending,
            created_at: Utc::now().to_rfc3339(),
            visited_at: None,
        };
        self.lists
            .entry(email.to_string())
            .or_default()
            .push(item.clone());
        self.persist()?;
        Ok(item)
    }

    /// Flip an item between pending and visited, stamping or clearing the
    /// visit time. No-op when the item is unknown.
    pub fn toggle_visited(&mut self, email: &str, item_id: &str) -> Result<(), AppError> {
        let Some(item) = self
            .lists
            .get_mut(email)
            .and_then(|items| items.iter_mut().find(|i| i.id == item_id))
        else {
            return Ok(());
        };

        match item.status {
            WishStatus::Pending => {
                item.status = WishStatus::Visited;
                item.visited_at = Some(Utc::now().to_rfc3339());
            }
            WishStatus::Visited => {
                item.status = WishStatus::Pending;
                item.visited_at = None;
            }
        }
        self.persist()
    }

    /// Remove an item from the user's wishlist.
    pub fn remove(&mut self, email: &str, item_id: &str) -> Result<(), AppError> {
        if let Some(items) = self.lists.get_mut(email) {
            items.retain(|i| i.id != item_id);
        }
        self.persist()
    }

    /// Rehydrate from storage (cross-tab storage-change signal).
    pub fn reload(&mut self) {
        self.lists = read_lists(self.storage.as_ref());
    }

    fn persist(&self) -> Result<(), AppError> {
        let raw = serde_json::to_string(&self.lists)?;
        self.storage.set(keys::WISHLIST, &raw)
    }
}

fn read_lists(storage: &dyn Storage) -> HashMap<String, Vec<WishlistItem>> {
    storage
        .get(keys::WISHLIST)
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default()
}
