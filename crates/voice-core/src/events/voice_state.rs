//! Voice state transitions delivered by the chat platform

use serde::{Deserialize, Serialize};

use crate::entities::SessionKey;
use crate::value_objects::Snowflake;

/// A member's voice channel changed within a guild
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceStateTransition {
    pub guild_id: Snowflake,
    pub member_id: Snowflake,
    /// Channel the member was in before the change
    #[serde(default)]
    pub before_channel_id: Option<Snowflake>,
    /// Channel the member is in now
    #[serde(default)]
    pub channel_id: Option<Snowflake>,
}

/// What a transition means for session tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// Entered voice from nowhere
    Join,
    /// Left voice entirely
    Leave,
    /// Moved between two voice channels; channel identity is not tracked
    Switch,
    /// Neither side had a channel
    Unchanged,
}

impl VoiceStateTransition {
    /// Session this transition applies to
    pub fn key(&self) -> SessionKey {
        SessionKey::new(self.member_id, self.guild_id)
    }

    /// Classify the transition
    pub fn kind(&self) -> TransitionKind {
        match (self.before_channel_id, self.channel_id) {
            (None, Some(_)) => TransitionKind::Join,
            (Some(_), None) => TransitionKind::Leave,
            (Some(_), Some(_)) => TransitionKind::Switch,
            (None, None) => TransitionKind::Unchanged,
        }
    }
}
