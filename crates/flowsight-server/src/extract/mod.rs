//! Request extractors.
//!
//! - [`Json`] deserializes bodies and rejects with the server's JSON errors.

mod json;

pub use json::Json;
