//! Per-user profile overlay store.
//!
//! Author snapshots embedded in pins and comments are immutable; this
//! overlay, keyed by email, supplies the current avatar and bio when a
//! profile page renders.

use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::AppError;
use crate::models::{Profile, User};
use crate::storage::{keys, Storage};

pub struct ProfileStore {
    storage: Arc<dyn Storage>,
    profiles: HashMap<String, Profile>,
}

impl ProfileStore {
    pub fn open(storage: Arc<dyn Storage>) -> Self {
        let profiles = read_profiles(storage.as_ref());
        Self { storage, profiles }
    }

    pub fn get(&self, email: &str) -> Option<&Profile> {
        self.profiles.get(email)
    }

    /// Save the current user's avatar and bio.
    pub fn save(
        &mut self,
        user: &User,
        profile_pic: &str,
        description: &str,
    ) -> Result<(), AppError> {
        self.profiles.insert(
            user.email.clone(),
            Profile {
                name: user.name.clone(),
                email: user.email.clone(),
                profile_pic: profile_pic.to_string(),
                description: description.to_string(),
            },
        );
        self.persist()
    }

    /// Rehydrate from storage (cross-tab storage-change signal).
    pub fn reload(&mut self) {
        self.profiles = read_profiles(self.storage.as_ref());
    }

    fn persist(&self) -> Result<(), AppError> {
        let raw = serde_json::to_string(&self.profiles)?;
        self.storage.set(keys::PROFILES, &raw)
    }
}

fn read_profiles(storage: &dyn Storage) -> HashMap<String, Profile> {
    storage
        .get(keys::PROFILES)
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_profile_overlay_roundtrip() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let mut store = ProfileStore::open(storage.clone());
        let user = User {
            id: "1".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        };

        assert!(store.get("ada@example.com").is_none());
        store.save(&user, "data:image/jpeg;base64,abc", "Traveler").unwrap();

        let reopened = ProfileStore::open(storage);
        let profile = reopened.get("ada@example.com").unwrap();
        assert_eq!(profile.description, "Traveler");
        assert_eq!(profile.name, "Ada");
    }
}
