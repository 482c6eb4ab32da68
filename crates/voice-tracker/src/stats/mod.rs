//! Ranked per-member totals

mod aggregator;
mod format;

pub use aggregator::StatsAggregator;
pub use format::format_duration;
