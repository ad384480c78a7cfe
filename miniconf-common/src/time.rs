//! Timestamp utilities

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::{Error, Result};

/// Format of every entity `start_time`
pub const START_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Parse an entity `start_time` as a UTC timestamp
pub fn parse_start_time(value: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, START_TIME_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|source| Error::InvalidTimestamp {
            value: value.to_string(),
            source,
        })
}

/// Full English weekday name ("Monday", "Tuesday", ...)
pub fn weekday_name(time: &DateTime<Utc>) -> String {
    time.format("%A").to_string()
}

/// Render a timestamp back into `START_TIME_FORMAT`
pub fn format_start_time(time: &DateTime<Utc>) -> String {
    time.format(START_TIME_FORMAT).to_string()
}
