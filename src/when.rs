//! Parsing slot times and lengths from the command line.
//!
//! Times without an offset are taken as UTC.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Parse a start or end instant ("2025-03-20T10:00", "2025-03-20", RFC 3339).
pub fn parse_datetime(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(dt.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
    }

    anyhow::bail!(
        "Could not parse date/time: \"{}\". Expected e.g. 2025-03-20T10:00",
        input
    )
}

/// Parse a length like "30m", "1h", "1h 30m".
pub fn parse_duration(input: &str) -> Result<Duration> {
    let std_dur = humantime::parse_duration(input.trim())
        .map_err(|e| anyhow::anyhow!("Could not parse duration \"{}\": {}", input, e))?;
    Duration::from_std(std_dur).context("Duration too large")
}

/// `start` plus `length`, or an error if that lands outside chrono's range.
pub fn add_length(start: DateTime<Utc>, length: Duration) -> Result<DateTime<Utc>> {
    start
        .checked_add_signed(length)
        .with_context(|| format!("Slot end out of range: {} after {}", length, start))
}

/// Parse an end input: a duration from `start` first, then an instant.
pub fn parse_end(input: &str, start: DateTime<Utc>) -> Result<DateTime<Utc>> {
    if let Ok(length) = parse_duration(input) {
        return add_length(start, length);
    }

    let cleaned = input
        .strip_prefix("until ")
        .or_else(|| input.strip_prefix("to "))
        .unwrap_or(input);

    parse_datetime(cleaned)
}

/// Parse YYYY-MM-DD as the start of that day.
pub fn parse_day_start(input: &str) -> Result<DateTime<Utc>> {
    let date = parse_day(input)?;
    Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
}

/// Parse YYYY-MM-DD as the start of the following day (exclusive end).
pub fn parse_day_end(input: &str) -> Result<DateTime<Utc>> {
    let next = parse_day(input)?
        .succ_opt()
        .with_context(|| format!("Date out of range: {}", input))?;
    Ok(next.and_time(chrono::NaiveTime::MIN).and_utc())
}

fn parse_day(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date format '{}'. Expected YYYY-MM-DD", input))
}
