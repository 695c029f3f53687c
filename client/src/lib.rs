//! Recipe Catalog Client
//!
//! Browser-side session handling for the recipe catalog: the API client,
//! token persistence, the startup session check, route guarding and the
//! auth and profile forms. Compiled to WebAssembly for the web app.

pub mod api;
pub mod auth_form;
pub mod catalog;
pub mod profile_form;
pub mod session;
pub mod storage;

mod bindings;

pub use api::{ApiClient, ClientError, Upload};
pub use session::{bootstrap, guard, Route, RouteDecision, SessionState};
pub use storage::{MemoryTokenStore, TokenStore};

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorageTokenStore;
