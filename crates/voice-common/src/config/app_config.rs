//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::auth::generate_secret;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub dashboard: DashboardConfig,
    pub jwt: JwtConfig,
    pub store: StoreConfig,
    pub database: Option<DatabaseConfig>,
    pub tracker: TrackerConfig,
    pub stats: StatsConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            other => Err(format!("unknown environment: {other}")),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Shared-secret gate in front of the dashboard
#[derive(Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_password")]
    pub password: String,
}

impl DashboardConfig {
    /// Whether the password was left at its built-in default
    #[must_use]
    pub fn uses_default_password(&self) -> bool {
        self.password == default_password()
    }
}

impl fmt::Debug for DashboardConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DashboardConfig")
            .field("password", &"<redacted>")
            .finish()
    }
}

/// JWT configuration
#[derive(Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("access_token_expiry", &self.access_token_expiry)
            .finish()
    }
}

/// Which durable store implementation to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Single JSON document rewritten on every commit
    #[default]
    Json,
    /// Process memory only
    Memory,
    /// PostgreSQL table
    Postgres,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "memory" => Ok(Self::Memory),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => Err(format!("unknown store backend: {other}")),
        }
    }
}

/// Durable store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default = "default_store_path")]
    pub path: String,
}

/// Database configuration (postgres backend only)
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Session tracking configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    #[serde(default = "default_flush_interval_secs")]
    pub flush_interval_secs: u64,
    /// Offset from UTC, in minutes, that defines calendar days
    #[serde(default)]
    pub utc_offset_minutes: i32,
    #[serde(default = "default_ingest_queue")]
    pub ingest_queue: usize,
}

impl TrackerConfig {
    #[must_use]
    pub fn flush_interval(&self) -> Duration {
        Duration::from_secs(self.flush_interval_secs.max(1))
    }

    /// Fixed offset for day bucketing; falls back to UTC if out of range
    #[must_use]
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).unwrap_or_else(|| Utc.fix())
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            flush_interval_secs: default_flush_interval_secs(),
            utc_offset_minutes: 0,
            ingest_queue: default_ingest_queue(),
        }
    }
}

/// Stats query configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StatsConfig {
    #[serde(default = "default_window_days")]
    pub default_window_days: u32,
    #[serde(default = "default_max_window_days")]
    pub max_window_days: u32,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            default_window_days: default_window_days(),
            max_window_days: default_max_window_days(),
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

// Default value functions
fn default_app_name() -> String {
    "voice-tracker".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_password() -> String {
    "admin".to_string()
}

fn default_access_token_expiry() -> i64 {
    43200 // 12 hours
}

fn default_store_path() -> String {
    "voice_data_final.json".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_flush_interval_secs() -> u64 {
    60
}

fn default_ingest_queue() -> usize {
    1024
}

fn default_window_days() -> u32 {
    7
}

fn default_max_window_days() -> u32 {
    3650
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

/// Parse an optional variable; present-but-invalid is an error
fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue(key, e.to_string())),
        _ => Ok(None),
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable is present but invalid, or a variable
    /// required by the selected store backend is missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = parse_var(&lookup, "STORE_BACKEND")?.unwrap_or_default();

        let database = match lookup("DATABASE_URL") {
            Some(url) if !url.trim().is_empty() => Some(DatabaseConfig {
                url,
                max_connections: parse_var(&lookup, "DATABASE_MAX_CONNECTIONS")?
                    .unwrap_or_else(default_max_connections),
                min_connections: parse_var(&lookup, "DATABASE_MIN_CONNECTIONS")?
                    .unwrap_or_else(default_min_connections),
            }),
            _ if backend == StoreBackend::Postgres => {
                return Err(ConfigError::MissingVar("DATABASE_URL"));
            }
            _ => None,
        };

        let utc_offset_minutes: i32 =
            parse_var(&lookup, "TRACKER_UTC_OFFSET_MINUTES")?.unwrap_or(0);
        if utc_offset_minutes.abs() >= 24 * 60 {
            return Err(ConfigError::InvalidValue(
                "TRACKER_UTC_OFFSET_MINUTES",
                format!("{utc_offset_minutes} is outside -1439..=1439"),
            ));
        }

        let flush_interval_secs: u64 = parse_var(&lookup, "TRACKER_FLUSH_INTERVAL_SECS")?
            .unwrap_or_else(default_flush_interval_secs);
        if flush_interval_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "TRACKER_FLUSH_INTERVAL_SECS",
                "must be at least 1".to_string(),
            ));
        }

        let stats = StatsConfig {
            default_window_days: parse_var(&lookup, "STATS_DEFAULT_WINDOW_DAYS")?
                .unwrap_or_else(default_window_days),
            max_window_days: parse_var(&lookup, "STATS_MAX_WINDOW_DAYS")?
                .unwrap_or_else(default_max_window_days),
        };
        if stats.default_window_days > stats.max_window_days {
            return Err(ConfigError::InvalidValue(
                "STATS_DEFAULT_WINDOW_DAYS",
                format!("exceeds STATS_MAX_WINDOW_DAYS ({})", stats.max_window_days),
            ));
        }

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: parse_var(&lookup, "APP_ENV")?.unwrap_or_default(),
            },
            api: ServerConfig {
                host: lookup("API_HOST").unwrap_or_else(default_host),
                port: parse_var(&lookup, "API_PORT")?.unwrap_or_else(default_port),
            },
            dashboard: DashboardConfig {
                password: lookup("WEB_PASSWORD")
                    .filter(|p| !p.is_empty())
                    .unwrap_or_else(default_password),
            },
            jwt: JwtConfig {
                // A per-process secret invalidates every token on restart
                secret: lookup("JWT_SECRET")
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| generate_secret(48)),
                access_token_expiry: parse_var(&lookup, "JWT_ACCESS_TOKEN_EXPIRY")?
                    .unwrap_or_else(default_access_token_expiry),
            },
            store: StoreConfig {
                backend,
                path: lookup("STORE_PATH").unwrap_or_else(default_store_path),
            },
            database,
            tracker: TrackerConfig {
                flush_interval_secs,
                utc_offset_minutes,
                ingest_queue: parse_var(&lookup, "TRACKER_INGEST_QUEUE")?
                    .unwrap_or_else(default_ingest_queue)
                    .max(1),
            },
            stats,
            rate_limit: RateLimitConfig {
                requests_per_second: parse_var(&lookup, "RATE_LIMIT_REQUESTS_PER_SECOND")?
                    .unwrap_or_else(default_requests_per_second),
                burst: parse_var(&lookup, "RATE_LIMIT_BURST")?.unwrap_or_else(default_burst),
            },
            cors: CorsConfig {
                allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|o| !o.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
