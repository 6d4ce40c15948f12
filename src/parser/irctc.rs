//! IRCTC e-ticket (Electronic Reservation Slip) extractor.

use super::time::localize;
use super::traits::{FieldExtractor, ProviderFormat};
use crate::itinerary::{Instant, PartialItinerary};
use chrono::NaiveDateTime;
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

const DATETIME_FORMAT: &str = "%H:%M %d-%b-%Y";
const NOT_AVAILABLE: &str = "N.A.";

// Start date, departure and arrival share one line on the slip.
static SCHEDULE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?m)Start Date\* (?P<start>.*?)\s+",
        r"Departure\* (?P<departure>.*?)\s+",
        r"Arrival\* (?P<arrival>.*?)\s*$",
    ))
    .unwrap()
});

// Booked-from, boarding-at and destination stations follow the "Booked From / To"
// header, each written as `NAME (CODE)`. The boarding-at station is skipped.
static STATIONS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s)Booked\sFrom\s*To\s*(?P<from>.*?)\s\(.*?\)\s*.*?\)\s*(?P<to>.*?)\s\(.*?\)",
    )
    .unwrap()
});

pub struct IrctcExtractor;

impl FieldExtractor for IrctcExtractor {
    fn extract(&self, text: &str) -> PartialItinerary {
        let mut fragment = PartialItinerary {
            travel_type: ProviderFormat::Irctc.travel_type().map(str::to_string),
            ..Default::default()
        };

        match SCHEDULE_LINE.captures(text) {
            Some(caps) => {
                fragment.departure = read_timestamp(&caps["departure"], "departure");
                fragment.arrival = read_timestamp(&caps["arrival"], "arrival");
            }
            None => warn!("Could not read any departure or arrival data from the ticket"),
        }

        match STATIONS.captures(text) {
            Some(caps) => {
                fragment.boarding_location = non_empty(&caps["from"]);
                fragment.destination = non_empty(&caps["to"]);
            }
            None => warn!("Could not read boarding location or destination from the ticket"),
        }

        fragment
    }
}

fn read_timestamp(raw: &str, label: &str) -> Option<Instant> {
    let raw = raw.trim();
    if raw == NOT_AVAILABLE {
        warn!("Ticket lists {} as {}", label, NOT_AVAILABLE);
        return None;
    }
    let parsed = NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT)
        .ok()
        .and_then(localize);
    if parsed.is_none() {
        warn!(
            "Could not read {} date and time '{}' from the ticket",
            label, raw
        );
    }
    parsed
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
