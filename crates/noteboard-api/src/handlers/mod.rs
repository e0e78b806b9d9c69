//! HTTP handlers for noteboard-api.
//!
//! Action routes always answer 200 with the action envelope; only transport
//! failures (missing identity, malformed path) use other status codes.

pub mod categories;
pub mod notes;
pub mod views;
