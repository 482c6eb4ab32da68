//! Store implementations
//!
//! Implementations of the `DailyTotalStore` port defined in voice-core.

mod daily_total;
pub(crate) mod error;
mod json_file;
mod memory;

pub use daily_total::PgDailyTotalStore;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
