//! Periodic flushing of open sessions

mod scheduler;

pub use scheduler::{FlushReport, FlushScheduler};
