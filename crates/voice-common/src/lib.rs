//! # voice-common
//!
//! Shared utilities including configuration, error handling, dashboard authentication, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{generate_secret, verify_shared_secret, AccessToken, Claims, JwtService};
pub use config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DashboardConfig, DatabaseConfig, Environment,
    JwtConfig, RateLimitConfig, ServerConfig, StatsConfig, StoreBackend, StoreConfig,
    TrackerConfig,
};
pub use error::{AppError, AppResult, ErrorResponse};
pub use telemetry::{
    init_tracing, init_tracing_with_config, try_init_tracing, try_init_tracing_with_config,
    TracingConfig, TracingError,
};
