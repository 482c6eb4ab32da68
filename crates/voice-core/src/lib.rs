//! # voice-core
//!
//! Domain layer containing ids, calendar day keys, session and total entities,
//! voice state events, and the ports the tracker talks through.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    AggregateRow, DailyTotal, GuildSummary, LiveSession, MemberProfile, SessionKey, VoicePresence,
};
pub use error::DomainError;
pub use events::{TransitionKind, VoiceStateTransition};
pub use traits::{DailyTotalStore, PlatformDirectory, RepoResult};
pub use value_objects::{DayKey, DayKeyParseError, DayWindow, Snowflake, SnowflakeParseError};
