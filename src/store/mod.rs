//! Stores owning the persisted collections.
//!
//! Each collection (pins, categories, users/session, profiles, wishlists)
//! is owned exclusively by its store; all mutation passes through store
//! operations, which persist the whole collection synchronously and emit
//! typed change events.

pub mod categories;
pub mod events;
pub mod pins;
pub mod profiles;
pub mod session;
pub mod wishlist;

pub use categories::*;
pub use events::*;
pub use pins::*;
pub use profiles::*;
pub use session::*;
pub use wishlist::*;
