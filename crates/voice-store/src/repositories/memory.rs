//! In-memory implementation of DailyTotalStore

use async_trait::async_trait;
use parking_lot::Mutex;

use voice_core::{DailyTotal, DailyTotalStore, DayKey, DayWindow, RepoResult, Snowflake};

use crate::document::TotalsDocument;

/// Process-local store; history is lost on exit
#[derive(Debug, Default)]
pub struct MemoryStore {
    doc: Mutex<TotalsDocument>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing document
    pub fn with_document(doc: TotalsDocument) -> Self {
        Self { doc: Mutex::new(doc) }
    }
}

#[async_trait]
impl DailyTotalStore for MemoryStore {
    async fn get(&self, guild_id: Snowflake, member_id: Snowflake, day: DayKey) -> RepoResult<u64> {
        Ok(self.doc.lock().get(guild_id, member_id, day))
    }

    async fn add(
        &self,
        guild_id: Snowflake,
        member_id: Snowflake,
        day: DayKey,
        delta_seconds: u64,
    ) -> RepoResult<u64> {
        Ok(self.doc.lock().add(guild_id, member_id, day, delta_seconds).total)
    }

    async fn list_days(&self, guild_id: Snowflake, member_id: Snowflake) -> RepoResult<Vec<DailyTotal>> {
        Ok(self.doc.lock().list_days(guild_id, member_id))
    }

    async fn totals_for_guild(&self, guild_id: Snowflake, window: DayWindow) -> RepoResult<Vec<DailyTotal>> {
        Ok(self.doc.lock().totals_for_guild(guild_id, window))
    }
}
