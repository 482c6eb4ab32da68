//! Axum extractors for request handling
//!
//! Custom extractors for authentication, validation, and path parameters.

mod auth;
mod path;
mod validated;

pub use auth::AuthUser;
pub use path::{GuildIdPath, GuildMemberPath};
pub use validated::{JsonBody, ValidatedJson, ValidatedQuery};
