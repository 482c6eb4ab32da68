//! # voice-tracker
//!
//! Tracking engine: the session table, the event ingestor that feeds it,
//! the periodic flush into the durable store, and the stats aggregation
//! the dashboard reads.

pub mod directory;
pub mod dto;
pub mod flush;
pub mod ingest;
pub mod services;
pub mod session;
pub mod stats;

pub use directory::InMemoryDirectory;
pub use flush::{FlushReport, FlushScheduler};
pub use ingest::{ingest_channel, EventIngestor, IngestHandle, PlatformEvent, TransitionOutcome};
pub use services::{
    AuthService, QueryService, TrackerContext, TrackerContextBuilder, TrackerError, TrackerResult,
    TrackerSettings,
};
pub use session::SessionTable;
pub use stats::{format_duration, StatsAggregator};
