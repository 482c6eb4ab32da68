//! Durable store port - per-day accumulated seconds keyed by (guild, member, day)
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation (JSON document, in-memory, PostgreSQL).

use async_trait::async_trait;

use crate::entities::DailyTotal;
use crate::error::DomainError;
use crate::value_objects::{DayKey, DayWindow, Snowflake};

/// Result type for store operations
pub type RepoResult<T> = Result<T, DomainError>;

#[async_trait]
pub trait DailyTotalStore: Send + Sync {
    /// Seconds accumulated for one key, 0 if never written
    async fn get(&self, guild_id: Snowflake, member_id: Snowflake, day: DayKey) -> RepoResult<u64>;

    /// Atomically add `delta_seconds` to one key and return the new total
    ///
    /// A zero delta must not create an entry.
    async fn add(
        &self,
        guild_id: Snowflake,
        member_id: Snowflake,
        day: DayKey,
        delta_seconds: u64,
    ) -> RepoResult<u64>;

    /// Every recorded day for one member of a guild
    async fn list_days(&self, guild_id: Snowflake, member_id: Snowflake)
        -> RepoResult<Vec<DailyTotal>>;

    /// Every entry of a guild whose day falls inside `window`
    async fn totals_for_guild(
        &self,
        guild_id: Snowflake,
        window: DayWindow,
    ) -> RepoResult<Vec<DailyTotal>>;

    /// Readiness probe
    async fn ping(&self) -> RepoResult<()> {
        Ok(())
    }
}
