//! Category registry: built-in and user-defined categories.

use std::sync::Arc;

use crate::errors::AppError;
use crate::models::{Category, BUILT_IN_CATEGORIES, DEFAULT_PIN_COLOR};
use crate::storage::{keys, Storage};

/// Tracks the fixed built-in categories and the globally shared custom ones.
///
/// Custom categories are persisted once introduced and never overwritten:
/// first writer wins for a given name. Built-ins are hardcoded and never
/// persisted or mutated.
pub struct CategoryRegistry {
    storage: Arc<dyn Storage>,
    custom: Vec<Category>,
}

impl CategoryRegistry {
    /// Hydrate the custom-category collection from storage.
    pub fn open(storage: Arc<dyn Storage>) -> Self {
        let custom = storage
            .get(keys::CUSTOM_CATEGORIES)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        Self { storage, custom }
    }

    pub fn built_ins(&self) -> Vec<Category> {
        BUILT_IN_CATEGORIES
            .iter()
            .map(|(name, color)| Category::new(*name, *color))
            .collect()
    }

    pub fn custom(&self) -> &[Category] {
        &self.custom
    }

    /// All categories offered by the creation form: built-ins then customs.
    pub fn all(&self) -> Vec<Category> {
        let mut all = self.built_ins();
        all.extend(self.custom.iter().cloned());
        all
    }

    fn built_in_color(name: &str) -> Option<&'static str> {
        BUILT_IN_CATEGORIES
            .iter()
            .find(|(built_in, _)| *built_in == name)
            .map(|(_, color)| *color)
    }

    /// Look up the registered color for a category name, built-in or custom.
    pub fn color_for(&self, name: &str) -> Option<String> {
        if let Some(color) = Self::built_in_color(name) {
            return Some(color.to_string());
        }
        self.custom
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.color.clone())
    }

    /// Resolve the display color stored on a pin at creation time.
    ///
    /// A built-in category keeps its fixed color unless the creator typed a
    /// non-empty custom-category name; everything else keeps the
    /// caller-supplied color.
    pub fn resolve_color(
        &self,
        category: &str,
        custom_name: Option<&str>,
        chosen_color: &str,
    ) -> String {
        let has_custom = custom_name.is_some_and(|name| !name.trim().is_empty());
        if !has_custom {
            if let Some(color) = Self::built_in_color(category) {
                return color.to_string();
            }
        }
        if chosen_color.is_empty() {
            DEFAULT_PIN_COLOR.to_string()
        } else {
            chosen_color.to_string()
        }
    }

    /// Persist a new custom category; no-op when the name already exists
    /// (built-in or custom). Returns whether a new entry was registered.
    pub fn register_custom(&mut self, name: &str, color: &str) -> Result<bool, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation(
                "Custom category name is required".to_string(),
            ));
        }
        if Self::built_in_color(name).is_some() || self.custom.iter().any(|c| c.name == name) {
            return Ok(false);
        }

        self.custom.push(Category::new(name, color));
        self.persist()?;
        tracing::debug!("Registered custom category {}", name);
        Ok(true)
    }

    /// Rehydrate from storage (cross-tab storage-change signal).
    pub fn reload(&mut self) {
        self.custom = self
            .storage
            .get(keys::CUSTOM_CATEGORIES)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
    }

    fn persist(&self) -> Result<(), AppError> {
        let raw = serde_json::to_string(&self.custom)?;
        self.storage.set(keys::CUSTOM_CATEGORIES, &raw)
    }
}
