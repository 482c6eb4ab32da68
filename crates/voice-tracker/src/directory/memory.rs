//! In-memory platform directory
//!
//! Guild names, member display names, and voice presence as last reported
//! by the platform. Uses `DashMap` so the ingestor can write while queries read.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use dashmap::DashMap;

use voice_core::{GuildSummary, MemberProfile, PlatformDirectory, Snowflake, VoicePresence};

use crate::ingest::GuildSnapshot;

#[derive(Debug, Default, Clone)]
struct GuildEntry {
    name: Option<String>,
    members: HashMap<Snowflake, String>,
    in_voice: HashSet<Snowflake>,
}

/// Directory fed by platform events
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    guilds: DashMap<Snowflake, GuildEntry>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace everything known about a guild with a fresh snapshot
    pub fn apply_snapshot(&self, snapshot: &GuildSnapshot) {
        let entry = GuildEntry {
            name: Some(snapshot.name.clone()),
            members: snapshot
                .members
                .iter()
                .map(|m| (m.user_id, m.display_name.clone()))
                .collect(),
            in_voice: snapshot.presences().into_iter().map(|p| p.member_id).collect(),
        };
        self.guilds.insert(snapshot.id, entry);
    }

    /// Set one member's display name
    pub fn upsert_member(&self, guild_id: Snowflake, member_id: Snowflake, display_name: impl Into<String>) {
        self.guilds
            .entry(guild_id)
            .or_default()
            .members
            .insert(member_id, display_name.into());
    }

    /// Record whether a member currently sits in a voice channel
    pub fn set_in_voice(&self, guild_id: Snowflake, member_id: Snowflake, in_voice: bool) {
        let mut entry = self.guilds.entry(guild_id).or_default();
        if in_voice {
            entry.in_voice.insert(member_id);
        } else {
            entry.in_voice.remove(&member_id);
        }
    }

    pub fn guild_count(&self) -> usize {
        self.guilds.len()
    }
}

#[async_trait]
impl PlatformDirectory for InMemoryDirectory {
    async fn guilds(&self) -> Vec<GuildSummary> {
        self.guilds
            .iter()
            .filter_map(|e| e.name.clone().map(|name| GuildSummary::new(*e.key(), name)))
            .collect()
    }

    async fn guild_name(&self, guild_id: Snowflake) -> Option<String> {
        self.guilds.get(&guild_id).and_then(|e| e.name.clone())
    }

    async fn member(&self, guild_id: Snowflake, member_id: Snowflake) -> Option<MemberProfile> {
        let entry = self.guilds.get(&guild_id)?;
        entry
            .members
            .get(&member_id)
            .map(|name| MemberProfile::new(member_id, name.clone()))
    }

    async fn voice_presences(&self) -> Vec<VoicePresence> {
        self.guilds
            .iter()
            .flat_map(|e| {
                let guild_id = *e.key();
                e.in_voice
                    .iter()
                    .map(|member_id| VoicePresence {
                        guild_id,
                        member_id: *member_id,
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}
