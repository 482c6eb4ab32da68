//! Database models - SQLx row types

mod daily_total;

pub use daily_total::DailyTotalModel;
