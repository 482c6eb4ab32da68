//! Ports - traits the tracker depends on and infrastructure implements

mod directory;
mod store;

pub use directory::PlatformDirectory;
pub use store::{DailyTotalStore, RepoResult};
