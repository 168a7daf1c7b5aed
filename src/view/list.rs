//! List coordinator: the filtered, searchable pin list.
//!
//! Criteria live only in this coordinator and reset when it is dropped;
//! filters are per-session, never persisted. Results are recomputed when
//! criteria change or when the pin store reports a change, using the store
//! revision to skip redundant work.

use std::sync::mpsc::Receiver;

use crate::filter::{self, Bounds, FilterCriteria};
use crate::models::Pin;
use crate::store::events::PinEvent;
use crate::store::pins::PinStore;

pub struct ListView {
    criteria: FilterCriteria,
    events: Receiver<PinEvent>,
    seen_revision: i64,
    dirty: bool,
    results: Vec<Pin>,
}

impl ListView {
    /// Subscribe to the pin store and compute the initial, unfiltered list.
    pub fn new(store: &mut PinStore) -> Self {
        let events = store.subscribe();
        let mut view = Self {
            criteria: FilterCriteria::default(),
            events,
            seen_revision: store.revision(),
            dirty: true,
            results: Vec::new(),
        };
        view.sync(store);
        view
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// The pins to display, in the order the filter engine produced.
    pub fn results(&self) -> &[Pin] {
        &self.results
    }

    pub fn set_region(&mut self, region: Option<String>) {
        self.criteria.region = region;
        self.dirty = true;
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.criteria.category = category;
        self.dirty = true;
    }

    pub fn set_keyword(&mut self, keyword: &str) {
        self.criteria.keyword = keyword.to_string();
        self.dirty = true;
    }

    /// Restrict to pins authored by the given email ("my pins" toggle).
    pub fn set_author(&mut self, author_email: Option<String>) {
        self.criteria.author_email = author_email;
        self.dirty = true;
    }

    /// Track the map viewport so the list mirrors what is on screen.
    pub fn set_bounds(&mut self, bounds: Option<Bounds>) {
        self.criteria.bounds = bounds;
        self.dirty = true;
    }

    pub fn clear_filters(&mut self) {
        self.criteria = FilterCriteria::default();
        self.dirty = true;
    }

    /// Region choices offered by the dropdown, derived from current pins.
    pub fn region_choices(&self, store: &PinStore) -> Vec<String> {
        filter::region_choices(store.pins())
    }

    /// Category choices offered by the dropdown, derived from current pins.
    pub fn category_choices(&self, store: &PinStore) -> Vec<String> {
        filter::category_choices(store.pins())
    }

    /// Drain pending pin events and recompute results when anything moved.
    pub fn sync(&mut self, store: &PinStore) {
        while let Ok(event) = self.events.try_recv() {
            if event.revision > self.seen_revision {
                self.seen_revision = event.revision;
                self.dirty = true;
            }
        }
        if !self.dirty {
            return;
        }
        self.results = filter::apply(store.pins(), &self.criteria)
            .into_iter()
            .cloned()
            .collect();
        self.dirty = false;
    }
}
