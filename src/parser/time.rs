//! Timestamp and duration parsing shared by flags, prompts and ticket extractors.

use crate::error::ItineraryError;
use crate::itinerary::{Instant, JourneyDuration};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%d %H:%M%:z"];
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

static OFFSET_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[+-]\d{2}:\d{2}$").unwrap());
static DURATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,4}):(\d{2})$").unwrap());

/// Parse `YYYY-MM-DD HH:MM[:SS][+HH:MM]` into an instant.
///
/// When no `±HH:MM` offset is written, the wall-clock time is taken to be in
/// the local timezone of the running process. Tickets and prompts never
/// carry zone information, so they always land here.
pub fn parse_instant(input: &str) -> Result<Instant, ItineraryError> {
    parse_instant_in(input, &Local)
}

/// Same as [`parse_instant`] but places offset-less input in `tz`
pub fn parse_instant_in<Tz: TimeZone>(input: &str, tz: &Tz) -> Result<Instant, ItineraryError> {
    let trimmed = input.trim();
    let normalized = normalize_separator(trimmed);
    let malformed = || ItineraryError::MalformedTimestamp(trimmed.to_string());

    if OFFSET_SUFFIX.is_match(&normalized) {
        return OFFSET_FORMATS
            .iter()
            .find_map(|fmt| DateTime::parse_from_str(&normalized, fmt).ok())
            .ok_or_else(malformed);
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&normalized, fmt).ok())
        .ok_or_else(malformed)?;
    localize_in(naive, tz).ok_or_else(malformed)
}

/// Attach the local offset to a wall-clock time read from a ticket
pub fn localize(naive: NaiveDateTime) -> Option<Instant> {
    localize_in(naive, &Local)
}

fn localize_in<Tz: TimeZone>(naive: NaiveDateTime, tz: &Tz) -> Option<Instant> {
    // Ambiguous times (clocks going back) take the earlier reading; times that
    // never existed (clocks going forward) are rejected.
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.fixed_offset())
}

/// Accept the ISO `T` separator as well as a space
fn normalize_separator(input: &str) -> String {
    match input.char_indices().nth(10) {
        Some((idx, 'T')) => format!("{} {}", &input[..idx], &input[idx + 1..]),
        _ => input.to_string(),
    }
}

/// Render an instant in the form [`parse_instant`] reads back
pub fn format_instant(instant: &Instant) -> String {
    instant.format("%Y-%m-%d %H:%M:%S%:z").to_string()
}

/// Parse an `HH:MM` journey duration
pub fn parse_duration(input: &str) -> Result<JourneyDuration, ItineraryError> {
    let trimmed = input.trim();
    let malformed = || ItineraryError::MalformedDuration(trimmed.to_string());

    let caps = DURATION.captures(trimmed).ok_or_else(malformed)?;
    let hours: u32 = caps[1].parse().map_err(|_| malformed())?;
    let minutes: u32 = caps[2].parse().map_err(|_| malformed())?;
    if minutes >= 60 {
        return Err(malformed());
    }
    Ok(JourneyDuration::from_hours_minutes(hours, minutes))
}
