//! Calendar day keys
//!
//! Daily totals are bucketed by calendar date in one fixed UTC offset. A
//! `DayKey` renders as `YYYY-MM-DD`, which is also its persisted form.

use chrono::{DateTime, Days, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const DAY_FORMAT: &str = "%Y-%m-%d";

/// A calendar date in the tracker's fixed time zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(NaiveDate);

impl DayKey {
    /// Wrap a calendar date
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Calendar day that `at` falls on in the given offset
    pub fn from_instant(at: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self(at.with_timezone(&offset).date_naive())
    }

    /// Build from year/month/day, `None` if the date does not exist
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Get the inner date
    pub const fn date(self) -> NaiveDate {
        self.0
    }

    /// The day `days` calendar days before this one, saturating at the minimum date
    pub fn minus_days(self, days: u32) -> Self {
        Self(
            self.0
                .checked_sub_days(Days::new(u64::from(days)))
                .unwrap_or(NaiveDate::MIN),
        )
    }

    /// Parse a `YYYY-MM-DD` string
    pub fn parse(s: &str) -> Result<Self, DayKeyParseError> {
        NaiveDate::parse_from_str(s.trim(), DAY_FORMAT)
            .map(Self)
            .map_err(|_| DayKeyParseError::InvalidFormat(s.to_string()))
    }
}

/// Error when parsing a DayKey from string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DayKeyParseError {
    #[error("invalid day key: {0} (expected YYYY-MM-DD)")]
    InvalidFormat(String),
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DAY_FORMAT))
    }
}

impl std::str::FromStr for DayKey {
    type Err = DayKeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DayKey::parse(s)
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl Serialize for DayKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DayKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DayKey::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Inclusive range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: DayKey,
    pub end: DayKey,
}

impl DayWindow {
    /// Window covering `today - days ..= today`
    pub fn trailing(today: DayKey, days: u32) -> Self {
        Self {
            start: today.minus_days(days),
            end: today,
        }
    }

    /// Check whether a day falls inside the window
    #[inline]
    pub fn contains(&self, day: DayKey) -> bool {
        self.start <= day && day <= self.end
    }
}
