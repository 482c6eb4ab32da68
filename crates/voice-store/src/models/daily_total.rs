//! Daily total database model

use chrono::NaiveDate;
use sqlx::FromRow;

/// Database model for voice_daily_totals table
#[derive(Debug, Clone, FromRow)]
pub struct DailyTotalModel {
    pub guild_id: i64,
    pub member_id: i64,
    pub day: NaiveDate,
    pub seconds: i64,
}
