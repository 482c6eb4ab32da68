//! Application state
//!
//! Holds the shared state for the Axum application: the tracker context,
//! the ingest queue handle, and configuration.

use std::sync::Arc;

use voice_common::{AppConfig, JwtService};
use voice_tracker::{IngestHandle, TrackerContext};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    tracker: TrackerContext,
    ingest: IngestHandle,
    config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(tracker: TrackerContext, ingest: IngestHandle, config: AppConfig) -> Self {
        Self {
            tracker,
            ingest,
            config: Arc::new(config),
        }
    }

    /// Get the tracker context
    pub fn tracker(&self) -> &TrackerContext {
        &self.tracker
    }

    /// Get the ingest queue handle
    pub fn ingest(&self) -> &IngestHandle {
        &self.ingest
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get the JWT service from the tracker context
    pub fn jwt_service(&self) -> &JwtService {
        self.tracker.jwt_service()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("tracker", &self.tracker)
            .field("ingest_closed", &self.ingest.is_closed())
            .field("config", &"AppConfig")
            .finish()
    }
}
