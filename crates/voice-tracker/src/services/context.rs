//! Tracker context - dependency container for the tracking engine
//!
//! Holds the session table, the durable store, the platform directory, and
//! the settings every component reads. Cheap to clone; long-running tasks
//! keep their own copy.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Offset, Utc};
use voice_common::{AppConfig, JwtService};
use voice_core::{DailyTotalStore, DayKey, PlatformDirectory};

use crate::directory::InMemoryDirectory;
use crate::session::SessionTable;

use super::error::{TrackerError, TrackerResult};

/// Settings the engine needs from configuration
#[derive(Clone)]
pub struct TrackerSettings {
    /// Offset that defines calendar days
    pub utc_offset: FixedOffset,
    pub default_window_days: u32,
    pub max_window_days: u32,
    /// Shared secret for the dashboard gate
    pub dashboard_password: String,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            utc_offset: Utc.fix(),
            default_window_days: 7,
            max_window_days: 3650,
            dashboard_password: "admin".to_string(),
        }
    }
}

impl TrackerSettings {
    /// Pull the engine's settings out of the application config
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            utc_offset: config.tracker.utc_offset(),
            default_window_days: config.stats.default_window_days,
            max_window_days: config.stats.max_window_days,
            dashboard_password: config.dashboard.password.clone(),
        }
    }
}

impl std::fmt::Debug for TrackerSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerSettings")
            .field("utc_offset", &self.utc_offset)
            .field("default_window_days", &self.default_window_days)
            .field("max_window_days", &self.max_window_days)
            .finish_non_exhaustive()
    }
}

/// Tracker context containing all dependencies
#[derive(Clone)]
pub struct TrackerContext {
    sessions: Arc<SessionTable>,
    store: Arc<dyn DailyTotalStore>,
    directory: Arc<InMemoryDirectory>,
    jwt_service: Arc<JwtService>,
    settings: Arc<TrackerSettings>,
}

impl TrackerContext {
    /// Create a new tracker context with all dependencies
    pub fn new(
        sessions: Arc<SessionTable>,
        store: Arc<dyn DailyTotalStore>,
        directory: Arc<InMemoryDirectory>,
        jwt_service: Arc<JwtService>,
        settings: TrackerSettings,
    ) -> Self {
        Self {
            sessions,
            store,
            directory,
            jwt_service,
            settings: Arc::new(settings),
        }
    }

    /// Get the session table
    pub fn sessions(&self) -> &SessionTable {
        self.sessions.as_ref()
    }

    /// Get the durable store
    pub fn store(&self) -> &dyn DailyTotalStore {
        self.store.as_ref()
    }

    /// Get the writable directory the ingestor maintains
    pub fn directory(&self) -> &InMemoryDirectory {
        self.directory.as_ref()
    }

    /// Get the directory through the read-only port
    pub fn platform(&self) -> &dyn PlatformDirectory {
        self.directory.as_ref()
    }

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    /// Calendar day `at` falls on
    pub fn day_of(&self, at: DateTime<Utc>) -> DayKey {
        DayKey::from_instant(at, self.settings.utc_offset)
    }
}

impl std::fmt::Debug for TrackerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerContext")
            .field("open_sessions", &self.sessions.len())
            .field("store", &"dyn DailyTotalStore")
            .field("guilds", &self.directory.guild_count())
            .field("settings", &self.settings)
            .finish()
    }
}

/// Builder for creating TrackerContext with custom configuration
#[derive(Default)]
pub struct TrackerContextBuilder {
    sessions: Option<Arc<SessionTable>>,
    store: Option<Arc<dyn DailyTotalStore>>,
    directory: Option<Arc<InMemoryDirectory>>,
    jwt_service: Option<Arc<JwtService>>,
    settings: Option<TrackerSettings>,
}

impl TrackerContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sessions(mut self, sessions: Arc<SessionTable>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    pub fn store(mut self, store: Arc<dyn DailyTotalStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn directory(mut self, directory: Arc<InMemoryDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn settings(mut self, settings: TrackerSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Build the TrackerContext
    ///
    /// # Errors
    /// Returns `TrackerError::Validation` if the store or JWT service is missing
    pub fn build(self) -> TrackerResult<TrackerContext> {
        Ok(TrackerContext::new(
            self.sessions.unwrap_or_default(),
            self.store.ok_or_else(|| TrackerError::validation("store is required"))?,
            self.directory.unwrap_or_default(),
            self.jwt_service.ok_or_else(|| TrackerError::validation("jwt_service is required"))?,
            self.settings.unwrap_or_default(),
        ))
    }
}
