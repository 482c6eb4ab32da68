//! DailyTotal entity <-> model mapper

use voice_core::{DailyTotal, DayKey, DomainError, Snowflake};

use crate::models::DailyTotalModel;
use crate::repositories::error::negative_seconds;

/// Convert DailyTotalModel to DailyTotal entity
impl TryFrom<DailyTotalModel> for DailyTotal {
    type Error = DomainError;

    fn try_from(model: DailyTotalModel) -> Result<Self, Self::Error> {
        let seconds = u64::try_from(model.seconds).map_err(|_| negative_seconds(model.seconds))?;

        Ok(DailyTotal::new(
            Snowflake::new(model.guild_id),
            Snowflake::new(model.member_id),
            DayKey::new(model.day),
            seconds,
        ))
    }
}
