//! Recipe Catalog Shared Library
//!
//! This crate contains the wire types and field validation used by both
//! the backend service and the browser client.

pub mod errors;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use types::*;
