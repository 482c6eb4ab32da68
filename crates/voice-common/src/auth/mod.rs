//! Dashboard authentication
//!
//! A single shared secret unlocks the dashboard; a successful login is
//! exchanged for a short-lived JWT bearer token.

mod jwt;
mod secret;

pub use jwt::{AccessToken, Claims, JwtService};
pub use secret::{generate_secret, verify_shared_secret};
