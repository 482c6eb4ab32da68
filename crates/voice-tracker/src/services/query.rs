//! Query service
//!
//! Read side used by the dashboard: guild listing, ranked stats, and a
//! member's per-day history.

use tracing::{instrument, warn};
use voice_core::{DomainError, Snowflake};

use crate::dto::{DayTotalResponse, GuildResponse, MemberStatsResponse, ReadinessResponse};
use crate::stats::StatsAggregator;

use super::context::TrackerContext;
use super::error::TrackerResult;

/// Query service
pub struct QueryService<'a> {
    ctx: &'a TrackerContext,
}

impl<'a> QueryService<'a> {
    /// Create a new QueryService
    pub fn new(ctx: &'a TrackerContext) -> Self {
        Self { ctx }
    }

    /// All known guilds, by name then id
    #[instrument(skip(self))]
    pub async fn list_guilds(&self) -> Vec<GuildResponse> {
        let mut guilds: Vec<GuildResponse> = self
            .ctx
            .platform()
            .guilds()
            .await
            .into_iter()
            .map(GuildResponse::from)
            .collect();
        guilds.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then(a.id.cmp(&b.id))
        });
        guilds
    }

    /// Ranked member totals for a guild
    ///
    /// `days` falls back to the configured default window.
    ///
    /// # Errors
    /// `WindowTooLarge` when `days` exceeds the configured maximum
    #[instrument(skip(self))]
    pub async fn get_stats(
        &self,
        guild_id: Snowflake,
        days: Option<u32>,
    ) -> TrackerResult<Vec<MemberStatsResponse>> {
        let settings = self.ctx.settings();
        let days = days.unwrap_or(settings.default_window_days);
        if days > settings.max_window_days {
            return Err(DomainError::WindowTooLarge {
                max: settings.max_window_days,
            }
            .into());
        }

        let rows = StatsAggregator::new(self.ctx).query(guild_id, days).await?;
        Ok(rows.into_iter().map(MemberStatsResponse::from).collect())
    }

    /// A member's per-day history, newest first
    #[instrument(skip(self))]
    pub async fn member_days(
        &self,
        guild_id: Snowflake,
        member_id: Snowflake,
    ) -> TrackerResult<Vec<DayTotalResponse>> {
        let days = self.ctx.store().list_days(guild_id, member_id).await?;
        Ok(days.iter().rev().map(DayTotalResponse::from).collect())
    }

    /// Readiness of the store and the ingestor
    pub async fn readiness(&self, ingestor_running: bool) -> ReadinessResponse {
        let store_healthy = match self.ctx.store().ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Store readiness check failed");
                false
            }
        };
        ReadinessResponse::ready(store_healthy, ingestor_running)
    }
}
