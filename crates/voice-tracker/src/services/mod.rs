//! Tracker services
//!
//! The dependency container, the error type, and the request-facing
//! services built on the engine.

pub mod auth;
pub mod context;
pub mod error;
pub mod query;

pub use auth::AuthService;
pub use context::{TrackerContext, TrackerContextBuilder, TrackerSettings};
pub use error::{TrackerError, TrackerResult};
pub use query::QueryService;
