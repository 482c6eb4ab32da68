//! Platform directory port - guild and member resolution provided by the chat platform
//!
//! Lookups are infallible: anything the platform cannot resolve is `None` and
//! callers degrade to fallback labels.

use async_trait::async_trait;

use crate::entities::{GuildSummary, MemberProfile, VoicePresence};
use crate::value_objects::Snowflake;

#[async_trait]
pub trait PlatformDirectory: Send + Sync {
    /// Every guild the platform client can see
    async fn guilds(&self) -> Vec<GuildSummary>;

    /// Display name of a guild
    async fn guild_name(&self, guild_id: Snowflake) -> Option<String>;

    /// Resolve a member of a guild
    async fn member(&self, guild_id: Snowflake, member_id: Snowflake) -> Option<MemberProfile>;

    /// Members currently sitting in a voice channel, across all guilds
    async fn voice_presences(&self) -> Vec<VoicePresence>;
}
