//! PostgreSQL implementation of DailyTotalStore

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use voice_core::{DailyTotal, DailyTotalStore, DayKey, DayWindow, RepoResult, Snowflake};

use crate::models::DailyTotalModel;

use super::error::{delta_out_of_range, map_db_error, negative_seconds};

/// PostgreSQL implementation of DailyTotalStore
#[derive(Clone)]
pub struct PgDailyTotalStore {
    pool: PgPool,
}

impl PgDailyTotalStore {
    /// Create a new PgDailyTotalStore
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DailyTotalStore for PgDailyTotalStore {
    #[instrument(skip(self))]
    async fn get(&self, guild_id: Snowflake, member_id: Snowflake, day: DayKey) -> RepoResult<u64> {
        let seconds = sqlx::query_scalar::<_, i64>(
            r"
            SELECT seconds FROM voice_daily_totals
            WHERE guild_id = $1 AND member_id = $2 AND day = $3
            ",
        )
        .bind(guild_id.into_inner())
        .bind(member_id.into_inner())
        .bind(day.date())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?
        .unwrap_or(0);

        u64::try_from(seconds).map_err(|_| negative_seconds(seconds))
    }

    #[instrument(skip(self))]
    async fn add(
        &self,
        guild_id: Snowflake,
        member_id: Snowflake,
        day: DayKey,
        delta_seconds: u64,
    ) -> RepoResult<u64> {
        if delta_seconds == 0 {
            return self.get(guild_id, member_id, day).await;
        }
        let delta = i64::try_from(delta_seconds).map_err(|_| delta_out_of_range(delta_seconds))?;

        // Single statement, so the read-modify-write happens under the row lock
        let total = sqlx::query_scalar::<_, i64>(
            r"
            INSERT INTO voice_daily_totals (guild_id, member_id, day, seconds)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (guild_id, member_id, day)
            DO UPDATE SET seconds = voice_daily_totals.seconds + EXCLUDED.seconds
            RETURNING seconds
            ",
        )
        .bind(guild_id.into_inner())
        .bind(member_id.into_inner())
        .bind(day.date())
        .bind(delta)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        u64::try_from(total).map_err(|_| negative_seconds(total))
    }

    #[instrument(skip(self))]
    async fn list_days(&self, guild_id: Snowflake, member_id: Snowflake) -> RepoResult<Vec<DailyTotal>> {
        let rows = sqlx::query_as::<_, DailyTotalModel>(
            r"
            SELECT guild_id, member_id, day, seconds
            FROM voice_daily_totals
            WHERE guild_id = $1 AND member_id = $2
            ORDER BY day ASC
            ",
        )
        .bind(guild_id.into_inner())
        .bind(member_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(DailyTotal::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn totals_for_guild(&self, guild_id: Snowflake, window: DayWindow) -> RepoResult<Vec<DailyTotal>> {
        let rows = sqlx::query_as::<_, DailyTotalModel>(
            r"
            SELECT guild_id, member_id, day, seconds
            FROM voice_daily_totals
            WHERE guild_id = $1 AND day BETWEEN $2 AND $3
            ",
        )
        .bind(guild_id.into_inner())
        .bind(window.start.date())
        .bind(window.end.date())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(DailyTotal::try_from).collect()
    }

    async fn ping(&self) -> RepoResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}
