//! Voice tracker API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p voice-api
//! ```
//!
//! Configuration is loaded from environment variables (and `.env`).

use tracing::{error, info};
use voice_common::{try_init_tracing_with_config, AppConfig, TracingConfig};

#[tokio::main]
async fn main() {
    // Load configuration before tracing so the log format follows the environment
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        address = %config.api.address(),
        store = ?config.store.backend,
        flush_interval_secs = config.tracker.flush_interval_secs,
        "Starting voice tracker"
    );

    if let Err(e) = voice_api::run(config).await {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}
