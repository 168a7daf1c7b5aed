//! View coordinators: the contracts between the stores and the rendering
//! surfaces.
//!
//! Coordinators hold only ephemeral UI state (pending creation buffers,
//! filter criteria, edit drafts) and borrow the stores per call, so every
//! read goes against the authoritative collections and nothing here
//! duplicates persisted state.

pub mod detail;
pub mod list;
pub mod map;

pub use detail::{DetailMode, DetailView};
pub use list::ListView;
pub use map::{MapSurface, MapView, Marker, ReverseGeocoder};
