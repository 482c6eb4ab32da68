//! # voice-api
//!
//! REST API server built with Axum framework: the dashboard's query
//! surface and the ingress the platform bridge pushes events to.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{build_context, create_app, run, start, BackgroundTasks};
pub use state::AppState;
