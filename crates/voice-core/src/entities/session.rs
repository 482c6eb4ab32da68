//! Session entities - a member's open interval in some voice channel of a guild

use crate::value_objects::Snowflake;

/// Identity of a session: at most one is open per (member, guild)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionKey {
    pub member_id: Snowflake,
    pub guild_id: Snowflake,
}

impl SessionKey {
    /// Create a new SessionKey
    #[inline]
    pub const fn new(member_id: Snowflake, guild_id: Snowflake) -> Self {
        Self {
            member_id,
            guild_id,
        }
    }
}

/// Read-only view of an open session at the moment a snapshot was taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveSession {
    pub key: SessionKey,
    /// Whole seconds since the session's last checkpoint
    pub elapsed_seconds: u64,
}
