//! Domain entities

mod daily_total;
mod directory;
mod session;
mod stats;

pub use daily_total::DailyTotal;
pub use directory::{GuildSummary, MemberProfile, VoicePresence};
pub use session::{LiveSession, SessionKey};
pub use stats::AggregateRow;
