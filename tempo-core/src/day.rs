//! Calendar-day helpers: "today" is a local-timezone concept.
//!
//! The daily review triggers on local day changes, so day resolution goes
//! through the user's configured IANA timezone instead of UTC.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Parse an IANA timezone name like "America/Chicago".
pub fn parse_timezone(tz: &str) -> Result<Tz> {
    tz.parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))
}

/// The calendar date of a UTC instant in the given timezone.
pub fn local_day(now: DateTime<Utc>, tz: Tz) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

pub fn parse_day(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DAY_FORMAT)
        .map_err(|e| anyhow::anyhow!("invalid day '{s}': {e}"))
}
