//! Value objects - immutable, identity-less domain primitives

mod day_key;
mod snowflake;

pub use day_key::{DayKey, DayKeyParseError, DayWindow};
pub use snowflake::{Snowflake, SnowflakeParseError};
