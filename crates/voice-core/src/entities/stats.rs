//! Aggregate row - one ranked line of a guild's voice statistics

use crate::value_objects::Snowflake;

/// Derived per-member total over a window (durable history plus live time)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateRow {
    pub member_id: Snowflake,
    pub name: String,
    pub total_seconds: u64,
    pub is_online: bool,
}
