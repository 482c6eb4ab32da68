//! Server setup and initialization
//!
//! Wires the store, the tracker context, and the background tasks, then
//! serves HTTP until a shutdown signal arrives.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use voice_common::{AppConfig, AppError, JwtService};
use voice_store::open_store;
use voice_tracker::{
    ingest_channel, EventIngestor, FlushReport, FlushScheduler, TrackerContext,
    TrackerContextBuilder, TrackerSettings,
};

use crate::middleware::{apply_middleware, apply_middleware_with_config};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let config = state.config();
    let api = apply_middleware_with_config(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    );
    let health = apply_middleware(health_routes());

    api.merge(health).with_state(state)
}

/// Open the store and assemble the tracker context
pub async fn build_context(config: &AppConfig) -> Result<TrackerContext, AppError> {
    let store = open_store(&config.store, config.database.as_ref())
        .await
        .map_err(|e| AppError::Store(e.to_string()))?;

    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
    ));

    TrackerContextBuilder::new()
        .store(store)
        .jwt_service(jwt_service)
        .settings(TrackerSettings::from_config(config))
        .build()
        .map_err(|e| AppError::Config(e.to_string()))
}

/// Ingestor and flush scheduler running beside the HTTP server
pub struct BackgroundTasks {
    stop_ingest: watch::Sender<bool>,
    stop_flush: watch::Sender<bool>,
    ingestor: JoinHandle<()>,
    flush: JoinHandle<FlushReport>,
}

impl BackgroundTasks {
    /// Stop the ingestor, let it drain, then stop the scheduler
    ///
    /// The scheduler runs one last flush on the way out, after every queued
    /// event has been applied.
    pub async fn shutdown(self) -> Option<FlushReport> {
        let _ = self.stop_ingest.send(true);
        if let Err(e) = self.ingestor.await {
            error!(error = %e, "Event ingestor task failed");
        }

        let _ = self.stop_flush.send(true);
        match self.flush.await {
            Ok(report) => Some(report),
            Err(e) => {
                error!(error = %e, "Flush scheduler task failed");
                None
            }
        }
    }
}

/// Build the state and spawn the background tasks
pub async fn start(config: AppConfig) -> Result<(AppState, BackgroundTasks), AppError> {
    if config.app.env.is_production() && config.dashboard.uses_default_password() {
        warn!("WEB_PASSWORD is not set, the dashboard uses the default password");
    }

    let ctx = build_context(&config).await?;
    let (ingest, rx) = ingest_channel(config.tracker.ingest_queue);

    let (stop_ingest, ingest_shutdown) = watch::channel(false);
    let (stop_flush, flush_shutdown) = watch::channel(false);

    let ingestor = tokio::spawn(EventIngestor::new(ctx.clone()).run(rx, ingest_shutdown));
    let flush = FlushScheduler::new(ctx.clone()).spawn(config.tracker.flush_interval(), flush_shutdown);

    info!(
        flush_interval_secs = config.tracker.flush_interval_secs,
        utc_offset_minutes = config.tracker.utc_offset_minutes,
        ingest_queue = config.tracker.ingest_queue,
        "Tracker started"
    );

    let tasks = BackgroundTasks {
        stop_ingest,
        stop_flush,
        ingestor,
        flush,
    };

    Ok((AppState::new(ctx, ingest, config), tasks))
}

/// Resolves on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}

/// Serve `app` on `listener` until `shutdown` resolves
pub async fn run_server(
    app: Router,
    listener: TcpListener,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<(), AppError> {
    let addr = listener
        .local_addr()
        .map_err(|e| AppError::Config(format!("Failed to read listener address: {e}")))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid listen address {}: {e}", config.api.address())))?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    let (state, tasks) = start(config).await?;
    let app = create_app(state);

    let served = run_server(app, listener, shutdown_signal()).await;

    if let Some(report) = tasks.shutdown().await {
        info!(
            committed = report.committed,
            seconds = report.seconds,
            failed = report.failed,
            "Final flush complete"
        );
    }

    served
}
