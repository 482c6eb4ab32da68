//! Entity <-> model mappers

mod daily_total;
