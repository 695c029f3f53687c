//! Authentication module
//!
//! Provides JWT bearer tokens, adaptive password hashing and the
//! middleware that guards authenticated routes.

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, JwtService, TokenError};
pub use middleware::{authenticate, require_auth, AuthUser};
pub use password::PasswordService;
