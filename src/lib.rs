//! Dot the World core
//!
//! Data model, mutation protocol, and view-coordinator contracts for a
//! personal travel journal: pins dropped on a map, with categories,
//! comments, authorship, filtering, and fuzzy search, persisted through a
//! string-valued key-value storage collaborator.

pub mod config;
pub mod errors;
pub mod filter;
pub mod models;
pub mod storage;
pub mod store;
pub mod view;

use std::sync::Arc;

use config::Config;
use errors::AppError;
use storage::{FileStorage, Storage};
use store::{CategoryRegistry, PinStore, ProfileStore, SessionStore, WishlistStore};

/// The assembled application: one storage backend and the stores over it.
pub struct App {
    pub config: Config,
    pub session: SessionStore,
    pub categories: CategoryRegistry,
    pub pins: PinStore,
    pub profiles: ProfileStore,
    pub wishlist: WishlistStore,
}

impl App {
    /// Open the app over file-backed storage at the configured data dir.
    pub fn open(config: Config) -> Result<Self, AppError> {
        let storage: Arc<dyn Storage> = Arc::new(FileStorage::open(&config.data_dir)?);
        Ok(Self::with_storage(config, storage))
    }

    /// Assemble the stores over an explicit storage backend.
    pub fn with_storage(config: Config, storage: Arc<dyn Storage>) -> Self {
        Self {
            config,
            session: SessionStore::open(storage.clone()),
            categories: CategoryRegistry::open(storage.clone()),
            pins: PinStore::open(storage.clone()),
            profiles: ProfileStore::open(storage.clone()),
            wishlist: WishlistStore::open(storage),
        }
    }

    /// Rehydrate every store from storage, as on a cross-tab storage signal.
    pub fn reload(&mut self) {
        self.session.reload();
        self.categories.reload();
        self.pins.reload();
        self.profiles.reload();
        self.wishlist.reload();
    }
}
