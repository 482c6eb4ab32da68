//! DailyTotal entity - accumulated voice seconds for one member, guild, and day

use serde::{Deserialize, Serialize};

use crate::value_objects::{DayKey, Snowflake};

/// Accumulated whole seconds for (guild, member, day)
///
/// Only ever grows: commits are additive and entries are never deleted here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub guild_id: Snowflake,
    pub member_id: Snowflake,
    pub day: DayKey,
    pub seconds: u64,
}

impl DailyTotal {
    /// Create a new DailyTotal
    pub fn new(guild_id: Snowflake, member_id: Snowflake, day: DayKey, seconds: u64) -> Self {
        Self {
            guild_id,
            member_id,
            day,
            seconds,
        }
    }
}
