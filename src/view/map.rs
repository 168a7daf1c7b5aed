//! Map coordinator: marker projection and the pin-creation flow.
//!
//! Between a map click and confirm/cancel there is exactly one pending
//! creation. Location names and encoded photos arrive from slow
//! collaborators after the click, so each pending creation carries a
//! generation token; completions stamped with a stale token are discarded,
//! which makes the last click win.

use crate::errors::AppError;
use crate::models::{Author, NewPin, PendingLocation, Pin, DEFAULT_PIN_COLOR, MAX_PHOTOS};
use crate::store::categories::CategoryRegistry;
use crate::store::pins::PinStore;

/// Commands the core issues to the map rendering collaborator.
///
/// The surface owns projection and tile rendering; the core only places,
/// removes, and recenters. `add_marker` returns an opaque handle used for
/// later removal.
pub trait MapSurface {
    fn add_marker(&mut self, marker: &Marker) -> u64;
    fn remove_marker(&mut self, handle: u64);
    fn recenter(&mut self, lat: f64, lng: f64, zoom: f64);
}

/// Resolves a coordinate pair to a best-effort display name.
///
/// Implementations may consult a geocoding service or a local gazetteer;
/// `None` means the lookup failed and the pin keeps an empty location name.
pub trait ReverseGeocoder {
    fn display_name(&self, lat: f64, lng: f64) -> Option<String>;
}

/// Projection of a pin onto the map surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    pub color: String,
    pub label: String,
}

struct PendingCreation {
    generation: u64,
    location: PendingLocation,
    photos: Vec<String>,
}

/// Coordinates map clicks, the single pending-creation buffer, and the
/// handoff to the pin store on confirm.
pub struct MapView {
    pending: Option<PendingCreation>,
    generation: u64,
    /// Pin id -> marker handle currently placed on the surface.
    placed: Vec<(String, u64)>,
}

impl Default for MapView {
    fn default() -> Self {
        Self::new()
    }
}

impl MapView {
    pub fn new() -> Self {
        Self {
            pending: None,
            generation: 0,
            placed: Vec::new(),
        }
    }

    /// Start a pin creation at a clicked coordinate.
    ///
    /// Replaces any previous pending creation and returns the generation
    /// token that in-flight completions must present.
    pub fn begin_placement(&mut self, lat: f64, lng: f64) -> u64 {
        self.generation += 1;
        self.pending = Some(PendingCreation {
            generation: self.generation,
            location: PendingLocation {
                lat,
                lng,
                location_name: String::new(),
            },
            photos: Vec::new(),
        });
        tracing::debug!("Pending pin at ({}, {})", lat, lng);
        self.generation
    }

    /// The location under confirmation, if a placement is pending.
    pub fn pending_location(&self) -> Option<&PendingLocation> {
        self.pending.as_ref().map(|p| &p.location)
    }

    /// Token of the live pending creation, if any.
    pub fn pending_token(&self) -> Option<u64> {
        self.pending.as_ref().map(|p| p.generation)
    }

    pub fn pending_photos(&self) -> &[String] {
        self.pending.as_ref().map(|p| p.photos.as_slice()).unwrap_or(&[])
    }

    /// Apply a completed reverse-geocode lookup to the pending creation.
    ///
    /// Discarded when the token is stale or nothing is pending.
    pub fn resolve_location(&mut self, token: u64, location_name: &str) {
        match &mut self.pending {
            Some(pending) if pending.generation == token => {
                pending.location.location_name = location_name.to_string();
            }
            _ => tracing::debug!("Discarded stale geocode result (token {})", token),
        }
    }

    /// Run the geocoder for the current pending creation and apply the
    /// result through the same staleness gate a slow completion would hit.
    pub fn request_location(&mut self, geocoder: &dyn ReverseGeocoder) {
        let Some((token, lat, lng)) = self
            .pending
            .as_ref()
            .map(|p| (p.generation, p.location.lat, p.location.lng))
        else {
            return;
        };
        if let Some(name) = geocoder.display_name(lat, lng) {
            self.resolve_location(token, &name);
        }
    }

    /// Attach a finished photo encoding to the pending creation.
    ///
    /// Stale tokens are discarded silently; exceeding the photo cap on the
    /// live pending creation is a validation error.
    pub fn attach_photo(&mut self, token: u64, encoded: &str) -> Result<(), AppError> {
        let Some(pending) = self.pending.as_mut().filter(|p| p.generation == token) else {
            tracing::debug!("Discarded stale photo result (token {})", token);
            return Ok(());
        };
        if pending.photos.len() >= MAX_PHOTOS {
            return Err(AppError::Validation(format!(
                "Maximum {} photos allowed",
                MAX_PHOTOS
            )));
        }
        pending.photos.push(encoded.to_string());
        Ok(())
    }

    /// Discard the pending creation without saving.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Commit the pending creation as a new pin.
    ///
    /// A typed-in custom category is registered first (first writer wins),
    /// then the pin is created with the buffered location and photos. The
    /// buffer clears only on success so a failed save leaves the form
    /// intact.
    pub fn confirm(
        &mut self,
        details: &NewPin,
        pins: &mut PinStore,
        registry: &mut CategoryRegistry,
        author: Option<Author>,
    ) -> Result<Pin, AppError> {
        let Some(pending) = &self.pending else {
            return Err(AppError::Validation(
                "No location selected on the map".to_string(),
            ));
        };

        let mut details = details.clone();
        if details.photos.is_empty() {
            details.photos = pending.photos.clone();
        }

        if let Some(custom) = details
            .custom_category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
        {
            let color = if details.color.is_empty() {
                DEFAULT_PIN_COLOR
            } else {
                details.color.as_str()
            };
            registry.register_custom(custom, color)?;
        }

        let pin = pins.create(&pending.location, &details, registry, author)?;
        self.pending = None;
        Ok(pin)
    }

    /// Project pins onto map markers, in collection order.
    pub fn markers(&self, pins: &[Pin]) -> Vec<Marker> {
        pins.iter()
            .map(|pin| Marker {
                id: pin.id.clone(),
                lat: pin.lat,
                lng: pin.lng,
                color: pin.color.clone(),
                label: if pin.name.is_empty() {
                    pin.category.clone()
                } else {
                    pin.name.clone()
                },
            })
            .collect()
    }

    /// Rebuild the surface's markers from the current pin collection.
    pub fn sync_markers(&mut self, pins: &[Pin], surface: &mut dyn MapSurface) {
        for (_, handle) in self.placed.drain(..) {
            surface.remove_marker(handle);
        }
        self.placed = self
            .markers(pins)
            .into_iter()
            .map(|marker| {
                let handle = surface.add_marker(&marker);
                (marker.id, handle)
            })
            .collect();
    }

    /// Recenter the camera on a pin, as when a list row is clicked.
    pub fn focus(&self, pin: &Pin, zoom: f64, surface: &mut dyn MapSurface) {
        surface.recenter(pin.lat, pin.lng, zoom);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    struct FixedGeocoder(&'static str);

    impl ReverseGeocoder for FixedGeocoder {
        fn display_name(&self, _lat: f64, _lng: f64) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    fn stores() -> (PinStore, CategoryRegistry) {
        let storage: Arc<dyn crate::storage::Storage> = Arc::new(MemoryStorage::new());
        (
            PinStore::open(storage.clone()),
            CategoryRegistry::open(storage),
        )
    }

    fn details(category: &str) -> NewPin {
        NewPin {
            name: "Lunch spot".to_string(),
            category: category.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_last_click_wins() {
        let mut view = MapView::new();
        let first = view.begin_placement(40.0, -74.0);
        let second = view.begin_placement(51.5, -0.1);

        // The first click's geocode completes late and must be discarded
        view.resolve_location(first, "New York, United States");
        assert_eq!(view.pending_location().unwrap().location_name, "");

        view.resolve_location(second, "London, United Kingdom");
        assert_eq!(
            view.pending_location().unwrap().location_name,
            "London, United Kingdom"
        );
    }

    #[test]
    fn test_stale_photo_discarded() {
        let mut view = MapView::new();
        let first = view.begin_placement(40.0, -74.0);
        view.begin_placement(51.5, -0.1);

        view.attach_photo(first, "data:image/jpeg;base64,old").unwrap();
        assert!(view.pending_photos().is_empty());
    }

    #[test]
    fn test_confirm_creates_pin_and_clears_buffer() {
        let (mut pins, mut registry) = stores();
        let mut view = MapView::new();
        let token = view.begin_placement(40.7, -74.0);
        view.request_location(&FixedGeocoder("New York, NY, United States"));
        view.attach_photo(token, "data:image/jpeg;base64,abc").unwrap();

        let pin = view
            .confirm(&details("Food"), &mut pins, &mut registry, None)
            .unwrap();
        assert_eq!(pin.location_name, "New York, NY, United States");
        assert_eq!(pin.color, "#e53935");
        assert_eq!(pin.photos.len(), 1);
        assert!(view.pending_location().is_none());
    }

    #[test]
    fn test_confirm_without_placement_rejected() {
        let (mut pins, mut registry) = stores();
        let mut view = MapView::new();
        assert!(view
            .confirm(&details("Food"), &mut pins, &mut registry, None)
            .is_err());
    }

    #[test]
    fn test_confirm_registers_custom_category() {
        let (mut pins, mut registry) = stores();
        let mut view = MapView::new();
        view.begin_placement(40.7, -74.0);

        let new_pin = NewPin {
            category: "Other".to_string(),
            custom_category: Some("Street Art".to_string()),
            color: "#8e24aa".to_string(),
            ..Default::default()
        };
        let pin = view
            .confirm(&new_pin, &mut pins, &mut registry, None)
            .unwrap();

        assert_eq!(pin.category, "Street Art");
        assert_eq!(pin.color, "#8e24aa");
        assert_eq!(registry.color_for("Street Art").as_deref(), Some("#8e24aa"));
    }

    #[test]
    fn test_cancel_discards_buffer() {
        let mut view = MapView::new();
        view.begin_placement(40.7, -74.0);
        view.cancel();
        assert!(view.pending_location().is_none());
    }

    #[derive(Default)]
    struct RecordingSurface {
        next_handle: u64,
        live: Vec<u64>,
        centered_on: Option<(f64, f64)>,
    }

    impl MapSurface for RecordingSurface {
        fn add_marker(&mut self, _marker: &Marker) -> u64 {
            self.next_handle += 1;
            self.live.push(self.next_handle);
            self.next_handle
        }

        fn remove_marker(&mut self, handle: u64) {
            self.live.retain(|&h| h != handle);
        }

        fn recenter(&mut self, lat: f64, lng: f64, _zoom: f64) {
            self.centered_on = Some((lat, lng));
        }
    }

    #[test]
    fn test_sync_markers_tracks_collection() {
        let (mut pins, mut registry) = stores();
        let mut view = MapView::new();
        let mut surface = RecordingSurface::default();

        view.begin_placement(40.7, -74.0);
        let pin = view
            .confirm(&details("Food"), &mut pins, &mut registry, None)
            .unwrap();
        view.sync_markers(pins.pins(), &mut surface);
        assert_eq!(surface.live.len(), 1);

        view.focus(&pin, 13.0, &mut surface);
        assert_eq!(surface.centered_on, Some((40.7, -74.0)));

        pins.delete(&pin.id).unwrap();
        view.sync_markers(pins.pins(), &mut surface);
        assert!(surface.live.is_empty());
    }

    #[test]
    fn test_photo_cap_enforced() {
        let mut view = MapView::new();
        let token = view.begin_placement(40.7, -74.0);
        for _ in 0..MAX_PHOTOS {
            view.attach_photo(token, "data:image/jpeg;base64,x").unwrap();
        }
        assert!(view.attach_photo(token, "data:image/jpeg;base64,x").is_err());
    }
}
