//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DashboardConfig, DatabaseConfig, Environment,
    JwtConfig, RateLimitConfig, ServerConfig, StatsConfig, StoreBackend, StoreConfig,
    TrackerConfig,
};
