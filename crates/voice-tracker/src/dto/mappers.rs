//! Entity to DTO mappers

use voice_core::{AggregateRow, DailyTotal, GuildSummary};

use crate::stats::format_duration;

use super::responses::{DayTotalResponse, GuildResponse, MemberStatsResponse};

impl From<GuildSummary> for GuildResponse {
    fn from(guild: GuildSummary) -> Self {
        Self {
            id: guild.id,
            name: guild.name,
        }
    }
}

impl From<AggregateRow> for MemberStatsResponse {
    fn from(row: AggregateRow) -> Self {
        Self {
            member_id: row.member_id,
            formatted_time: format_duration(row.total_seconds),
            name: row.name,
            total_seconds: row.total_seconds,
            is_online: row.is_online,
        }
    }
}

impl From<&DailyTotal> for DayTotalResponse {
    fn from(total: &DailyTotal) -> Self {
        Self {
            day: total.day,
            seconds: total.seconds,
        }
    }
}
