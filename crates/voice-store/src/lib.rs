//! # voice-store
//!
//! Durable Store implementations of the `DailyTotalStore` port.
//!
//! ## Overview
//!
//! - `JsonFileStore`: one JSON document rewritten atomically on every commit
//! - `MemoryStore`: process-local, for ephemeral runs and tests
//! - `PgDailyTotalStore`: PostgreSQL via SQLx, one row per (guild, member, day)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use voice_store::open_store;
//!
//! async fn example(config: &voice_common::AppConfig) -> Result<(), Box<dyn std::error::Error>> {
//!     let store = open_store(&config.store, config.database.as_ref()).await?;
//!     store.add(guild_id, member_id, today, 60).await?;
//!     Ok(())
//! }
//! ```

mod backend;
pub mod document;
mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use backend::open_store;
pub use document::TotalsDocument;
pub use pool::{create_pool, ensure_schema, PgPool};
pub use repositories::{JsonFileStore, MemoryStore, PgDailyTotalStore};
