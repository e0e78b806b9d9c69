//! # noteboard-core
//!
//! Core types, traits, and validation rules for the noteboard service.
//!
//! This crate provides the data structures shared by the storage layer, the
//! action layer and the client controllers, together with the repository
//! traits that concrete stores implement.

pub mod defaults;
pub mod error;
pub mod messages;
pub mod models;
pub mod traits;
pub mod validation;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
pub use validation::{
    is_hex_color, normalize_name, normalize_title, validate_color, validate_content,
};
