//! Platform directory entities - what the chat platform tells us about guilds and members

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Guild id and display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildSummary {
    pub id: Snowflake,
    pub name: String,
}

impl GuildSummary {
    pub fn new(id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A guild member as resolved by the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberProfile {
    pub id: Snowflake,
    pub display_name: String,
}

impl MemberProfile {
    pub fn new(id: Snowflake, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }

    /// Label used when the platform cannot resolve a member
    pub fn fallback_label(id: Snowflake) -> String {
        format!("User {id}")
    }
}

/// "Member is currently in a voice channel of this guild"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoicePresence {
    pub guild_id: Snowflake,
    pub member_id: Snowflake,
}
