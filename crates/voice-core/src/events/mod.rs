//! Domain events

mod voice_state;

pub use voice_state::{TransitionKind, VoiceStateTransition};
