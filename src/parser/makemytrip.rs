//! MakeMyTrip flight e-ticket extractor.
//!
//! Each side of a flight leg reads as a block of lines, departure first:
//!
//! ```text
//! Tue 13:50 hrs
//! Tue, 14 Jan
//! Indira Gandhi International Airport
//! Terminal 3, New Delhi
//! Flight 6E 2134 2025 Economy 6h 15m duration
//! 20:05 hrs Tue
//! Tue, 14 Jan
//! Chhatrapati Shivaji International Airport
//! Terminal 2, Mumbai
//! ```
//!
//! Neither block carries a year; it is read from the line with the
//! `6h 15m duration` note. Without it the timestamps are left unset.

use super::time::localize;
use super::traits::{FieldExtractor, ProviderFormat};
use crate::itinerary::{Instant, JourneyDuration, PartialItinerary};
use chrono::NaiveDateTime;
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

static DEPARTURE_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\w{3} (?P<time>\d{2}:\d{2}) hrs\n(?P<date>.*)\n(?P<line1>.*)\n(?P<line2>.*)",
    )
    .unwrap()
});
static ARRIVAL_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?P<time>\d{2}:\d{2}) hrs \w{3}\n(?P<date>.*)\n(?P<line1>.*)\n(?P<line2>.*)",
    )
    .unwrap()
});
static DURATION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:\b(?P<year>(?:19|20)\d{2})\b.*?)?\b(?P<hours>\d{1,2})h (?P<minutes>\d{1,2})m duration",
    )
    .unwrap()
});
static DAY_MONTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?P<day>\d{1,2}) (?P<month>[A-Za-z]{3})").unwrap());

pub struct MakeMyTripExtractor;

impl FieldExtractor for MakeMyTripExtractor {
    fn extract(&self, text: &str) -> PartialItinerary {
        let mut fragment = PartialItinerary {
            travel_type: ProviderFormat::MakeMyTrip.travel_type().map(str::to_string),
            ..Default::default()
        };

        let duration_caps = DURATION_LINE.captures(text);
        fragment.duration = duration_caps.as_ref().and_then(|caps| {
            let hours = caps["hours"].parse().ok()?;
            let minutes: u32 = caps["minutes"].parse().ok()?;
            (minutes < 60)
                .then(|| JourneyDuration::from_hours_minutes(hours, minutes))
        });
        if fragment.duration.is_none() {
            warn!("Could not read the journey duration from the ticket");
        }

        // Other years on the ticket (booking date, fare validity) say nothing about the flight
        let year = duration_caps
            .as_ref()
            .and_then(|caps| caps.name("year"))
            .and_then(|m| m.as_str().parse::<i32>().ok());
        if year.is_none() {
            warn!("Could not read the travel year from the ticket");
        }

        match DEPARTURE_BLOCK.captures(text) {
            Some(caps) => {
                fragment.departure =
                    year.and_then(|y| read_timestamp(&caps["date"], &caps["time"], y));
                fragment.boarding_location = join_lines(&caps["line1"], &caps["line2"]);
            }
            None => warn!("Could not read departure time or boarding location from the ticket"),
        }
        if fragment.departure.is_none() {
            warn!("Could not read departure date and time from the ticket");
        }

        match ARRIVAL_BLOCK.captures(text) {
            Some(caps) => {
                fragment.arrival = year.and_then(|y| {
                    let arrival = read_timestamp(&caps["date"], &caps["time"], y)?;
                    match fragment.departure {
                        // Overnight flights around new year land in the next year
                        Some(departure) if arrival < departure => {
                            read_timestamp(&caps["date"], &caps["time"], y + 1)
                        }
                        _ => Some(arrival),
                    }
                });
                fragment.destination = join_lines(&caps["line1"], &caps["line2"]);
            }
            None => warn!("Could not read arrival time or destination from the ticket"),
        }

        fragment
    }
}

fn read_timestamp(date_line: &str, time: &str, year: i32) -> Option<Instant> {
    let caps = DAY_MONTH.captures(date_line)?;
    let raw = format!("{} {} {} {}", &caps["day"], &caps["month"], year, time);
    let naive = NaiveDateTime::parse_from_str(&raw, "%d %b %Y %H:%M").ok()?;
    localize(naive)
}

fn join_lines(first: &str, second: &str) -> Option<String> {
    let joined = format!("{} {}", first.trim(), second.trim());
    let joined = joined.trim();
    (!joined.is_empty()).then(|| joined.to_string())
}
