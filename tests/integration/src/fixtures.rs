//! Test fixtures and data generators
//!
//! Platform event builders and the response shapes tests deserialize.

use serde::Deserialize;
use serde_json::{json, Value};

/// GUILD_CREATE with named members and who is currently in voice
pub fn guild_create(guild_id: u64, name: &str, members: &[(u64, &str)], in_voice: &[u64]) -> Value {
    json!({
        "t": "GUILD_CREATE",
        "d": {
            "id": guild_id.to_string(),
            "name": name,
            "members": members
                .iter()
                .map(|(id, display_name)| json!({ "user_id": id.to_string(), "display_name": display_name }))
                .collect::<Vec<_>>(),
            "voice_states": in_voice
                .iter()
                .map(|id| json!({ "user_id": id.to_string(), "channel_id": "900" }))
                .collect::<Vec<_>>(),
        }
    })
}

/// VOICE_STATE_UPDATE for a member entering voice
pub fn voice_join(guild_id: u64, member_id: u64, channel_id: u64) -> Value {
    voice_state(guild_id, member_id, None, Some(channel_id))
}

/// VOICE_STATE_UPDATE for a member leaving voice
pub fn voice_leave(guild_id: u64, member_id: u64, channel_id: u64) -> Value {
    voice_state(guild_id, member_id, Some(channel_id), None)
}

/// VOICE_STATE_UPDATE with explicit channels on both sides
pub fn voice_state(guild_id: u64, member_id: u64, before: Option<u64>, after: Option<u64>) -> Value {
    json!({
        "t": "VOICE_STATE_UPDATE",
        "d": {
            "guild_id": guild_id.to_string(),
            "user_id": member_id.to_string(),
            "before_channel_id": before.map(|c| c.to_string()),
            "channel_id": after.map(|c| c.to_string()),
        }
    })
}

/// Login response
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Guild listing entry
#[derive(Debug, Deserialize)]
pub struct GuildEntry {
    pub id: String,
    pub name: String,
}

/// Stats row
#[derive(Debug, Deserialize)]
pub struct StatsRow {
    pub member_id: String,
    pub name: String,
    pub total_seconds: u64,
    pub formatted_time: String,
    pub is_online: bool,
}

/// Member day entry
#[derive(Debug, Deserialize)]
pub struct DayEntry {
    pub day: String,
    pub seconds: u64,
}

/// Error envelope
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
