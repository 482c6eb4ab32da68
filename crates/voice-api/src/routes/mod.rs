//! Route definitions
//!
//! API routes mounted under /api/v1; health probes live at the root.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{auth, guilds, health, platform};
use crate::state::AppState;

/// Create the main API router (health routes are mounted separately)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(guild_routes())
        .merge(platform_routes())
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(auth::login))
}

/// Guild routes
fn guild_routes() -> Router<AppState> {
    Router::new()
        .route("/guilds", get(guilds::list_guilds))
        .route("/guilds/:guild_id/stats", get(guilds::get_stats))
        .route("/guilds/:guild_id/members/:member_id/days", get(guilds::member_days))
}

/// Platform bridge routes
fn platform_routes() -> Router<AppState> {
    Router::new().route("/platform/events", post(platform::ingest_event))
}
