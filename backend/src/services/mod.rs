//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! the stores, the token service and password hashing.

pub mod recipe;
pub mod user;

pub use recipe::{RecipeInput, RecipeService};
pub use user::{ProfileInput, Registration, UserService};
