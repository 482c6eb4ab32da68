//! Platform events
//!
//! Gateway-style dispatches pushed by the platform bridge. Each arrives as
//! `{"t": "<EVENT_TYPE>", "d": <payload>}`.

use serde::{Deserialize, Serialize};
use voice_core::{Snowflake, VoicePresence, VoiceStateTransition};

/// One dispatch from the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t", content = "d", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlatformEvent {
    /// Session start: every guild the client can see
    Ready(ReadyPayload),
    /// Guild became available
    GuildCreate(GuildSnapshot),
    /// A member's display name changed
    GuildMemberUpdate(MemberUpdatePayload),
    /// A member's voice channel changed
    VoiceStateUpdate(VoiceStatePayload),
}

impl PlatformEvent {
    /// Event type name as it appears in `t`
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Ready(_) => "READY",
            Self::GuildCreate(_) => "GUILD_CREATE",
            Self::GuildMemberUpdate(_) => "GUILD_MEMBER_UPDATE",
            Self::VoiceStateUpdate(_) => "VOICE_STATE_UPDATE",
        }
    }
}

/// READY payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadyPayload {
    #[serde(default)]
    pub guilds: Vec<GuildSnapshot>,
}

/// Full state of one guild
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildSnapshot {
    pub id: Snowflake,
    pub name: String,
    #[serde(default)]
    pub members: Vec<MemberPayload>,
    /// Members currently in a voice channel
    #[serde(default)]
    pub voice_states: Vec<VoiceStateEntry>,
}

impl GuildSnapshot {
    /// Presences for members sitting in a channel
    pub fn presences(&self) -> Vec<VoicePresence> {
        self.voice_states
            .iter()
            .filter(|v| v.channel_id.is_some())
            .map(|v| VoicePresence {
                guild_id: self.id,
                member_id: v.user_id,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberPayload {
    pub user_id: Snowflake,
    pub display_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceStateEntry {
    pub user_id: Snowflake,
    #[serde(default)]
    pub channel_id: Option<Snowflake>,
}

/// GUILD_MEMBER_UPDATE payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberUpdatePayload {
    pub guild_id: Snowflake,
    pub user_id: Snowflake,
    pub display_name: String,
}

/// VOICE_STATE_UPDATE payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceStatePayload {
    pub guild_id: Snowflake,
    pub user_id: Snowflake,
    #[serde(default)]
    pub before_channel_id: Option<Snowflake>,
    #[serde(default)]
    pub channel_id: Option<Snowflake>,
}

impl From<VoiceStatePayload> for VoiceStateTransition {
    fn from(p: VoiceStatePayload) -> Self {
        VoiceStateTransition {
            guild_id: p.guild_id,
            member_id: p.user_id,
            before_channel_id: p.before_channel_id,
            channel_id: p.channel_id,
        }
    }
}
