//! Data models for the Dot the World application.
//!
//! Serialized shapes match the JSON payloads the browser app keeps in
//! key-value storage, so existing collections hydrate unchanged.

mod category;
mod comment;
mod pin;
mod user;

pub use category::*;
pub use comment::*;
pub use pin::*;
pub use user::*;
