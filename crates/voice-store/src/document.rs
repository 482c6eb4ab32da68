//! In-memory totals document shared by the JSON and memory stores
//!
//! Shape on disk: `{ "<guild_id>": { "<member_id>": { "YYYY-MM-DD": seconds } } }`.

use std::collections::BTreeMap;

use serde_json::Value;
use voice_core::{DailyTotal, DayKey, DayWindow, Snowflake};

type MemberDays = BTreeMap<DayKey, u64>;
type GuildMembers = BTreeMap<Snowflake, MemberDays>;

/// Nested guild → member → day → seconds map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TotalsDocument {
    guilds: BTreeMap<Snowflake, GuildMembers>,
}

/// Outcome of an increment, enough to undo it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applied {
    pub total: u64,
    pub previous: Option<u64>,
}

impl TotalsDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.guilds.is_empty()
    }

    pub fn get(&self, guild_id: Snowflake, member_id: Snowflake, day: DayKey) -> u64 {
        self.guilds
            .get(&guild_id)
            .and_then(|members| members.get(&member_id))
            .and_then(|days| days.get(&day))
            .copied()
            .unwrap_or(0)
    }

    /// Add seconds to one counter; a zero delta leaves the document untouched
    pub fn add(&mut self, guild_id: Snowflake, member_id: Snowflake, day: DayKey, delta: u64) -> Applied {
        if delta == 0 {
            let total = self.get(guild_id, member_id, day);
            return Applied {
                total,
                previous: Some(total),
            };
        }

        let slot = self
            .guilds
            .entry(guild_id)
            .or_default()
            .entry(member_id)
            .or_default()
            .entry(day);

        let mut previous = None;
        let total = match slot {
            std::collections::btree_map::Entry::Occupied(mut e) => {
                previous = Some(*e.get());
                let next = e.get().saturating_add(delta);
                e.insert(next);
                next
            }
            std::collections::btree_map::Entry::Vacant(e) => *e.insert(delta),
        };

        Applied { total, previous }
    }

    /// Undo an `add` using what it returned
    pub fn restore(&mut self, guild_id: Snowflake, member_id: Snowflake, day: DayKey, applied: Applied) {
        let Some(members) = self.guilds.get_mut(&guild_id) else {
            return;
        };
        let Some(days) = members.get_mut(&member_id) else {
            return;
        };

        match applied.previous {
            Some(prev) => {
                days.insert(day, prev);
            }
            None => {
                days.remove(&day);
                if days.is_empty() {
                    members.remove(&member_id);
                }
                if members.is_empty() {
                    self.guilds.remove(&guild_id);
                }
            }
        }
    }

    pub fn list_days(&self, guild_id: Snowflake, member_id: Snowflake) -> Vec<DailyTotal> {
        self.guilds
            .get(&guild_id)
            .and_then(|members| members.get(&member_id))
            .map(|days| {
                days.iter()
                    .map(|(day, secs)| DailyTotal::new(guild_id, member_id, *day, *secs))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn totals_for_guild(&self, guild_id: Snowflake, window: DayWindow) -> Vec<DailyTotal> {
        let Some(members) = self.guilds.get(&guild_id) else {
            return Vec::new();
        };
        if window.start > window.end {
            return Vec::new();
        }

        members
            .iter()
            .flat_map(|(member_id, days)| {
                days.range(window.start..=window.end)
                    .map(move |(day, secs)| DailyTotal::new(guild_id, *member_id, *day, *secs))
            })
            .collect()
    }

    /// Render the document as pretty JSON
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec_pretty(&self.to_value())
    }

    fn to_value(&self) -> Value {
        let mut root = serde_json::Map::new();
        for (guild_id, members) in &self.guilds {
            let mut guild = serde_json::Map::new();
            for (member_id, days) in members {
                let member: serde_json::Map<String, Value> = days
                    .iter()
                    .map(|(day, secs)| (day.to_string(), Value::from(*secs)))
                    .collect();
                guild.insert(member_id.to_string(), Value::Object(member));
            }
            root.insert(guild_id.to_string(), Value::Object(guild));
        }
        Value::Object(root)
    }

    /// Parse a document, skipping individual entries that are not well formed
    ///
    /// Returns the document and the number of entries that were dropped.
    /// Fails only when the input is not a JSON object at all.
    pub fn from_json(bytes: &[u8]) -> Result<(Self, usize), serde_json::Error> {
        let root: serde_json::Map<String, Value> = serde_json::from_slice(bytes)?;

        let mut doc = Self::new();
        let mut skipped = 0;

        for (guild_key, members) in root {
            let (Ok(guild_id), Value::Object(members)) = (Snowflake::parse(&guild_key), members) else {
                skipped += 1;
                continue;
            };
            for (member_key, days) in members {
                let (Ok(member_id), Value::Object(days)) = (Snowflake::parse(&member_key), days) else {
                    skipped += 1;
                    continue;
                };
                for (day_key, secs) in days {
                    match (DayKey::parse(&day_key), parse_seconds(&secs)) {
                        (Ok(day), Some(secs)) => {
                            doc.add(guild_id, member_id, day, secs);
                        }
                        _ => skipped += 1,
                    }
                }
            }
        }

        Ok((doc, skipped))
    }
}

/// Whole non-negative seconds; floats are truncated
fn parse_seconds(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0)
            .map(|f| f as u64)
    })
}
