//! Event ingestion - platform events into the session table

mod events;
mod ingestor;

pub use events::{
    GuildSnapshot, MemberPayload, MemberUpdatePayload, PlatformEvent, ReadyPayload,
    VoiceStateEntry, VoiceStatePayload,
};
pub use ingestor::{ingest_channel, EventIngestor, IngestHandle, TransitionOutcome};
