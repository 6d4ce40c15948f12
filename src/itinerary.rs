use chrono::{DateTime, Duration, FixedOffset};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An absolute point in time carrying the offset it was written with
pub type Instant = DateTime<FixedOffset>;

/// A journey length in whole minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct JourneyDuration(u32);

impl JourneyDuration {
    pub fn from_minutes(minutes: u32) -> Self {
        Self(minutes)
    }

    pub fn from_hours_minutes(hours: u32, minutes: u32) -> Self {
        Self(hours * 60 + minutes)
    }

    pub fn minutes(&self) -> u32 {
        self.0
    }

    /// Span between two instants, `None` when `to` precedes `from`
    pub fn between(from: &Instant, to: &Instant) -> Option<Self> {
        let minutes = (*to - *from).num_minutes();
        u32::try_from(minutes).ok().map(Self)
    }

    pub fn as_chrono(&self) -> Duration {
        Duration::minutes(i64::from(self.0))
    }
}

impl fmt::Display for JourneyDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// Google Calendar event colours, in color id order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventColor {
    Lavender,
    Sage,
    Grape,
    Flamingo,
    Banana,
    Tangerine,
    #[default]
    Peacock,
    Graphite,
    Blueberry,
    Basil,
    Tomato,
}

impl EventColor {
    /// The `colorId` the calendar API expects
    pub fn color_id(&self) -> u8 {
        match self {
            EventColor::Lavender => 1,
            EventColor::Sage => 2,
            EventColor::Grape => 3,
            EventColor::Flamingo => 4,
            EventColor::Banana => 5,
            EventColor::Tangerine => 6,
            EventColor::Peacock => 7,
            EventColor::Graphite => 8,
            EventColor::Blueberry => 9,
            EventColor::Basil => 10,
            EventColor::Tomato => 11,
        }
    }
}

impl fmt::Display for EventColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventColor::Lavender => "Lavender",
            EventColor::Sage => "Sage",
            EventColor::Grape => "Grape",
            EventColor::Flamingo => "Flamingo",
            EventColor::Banana => "Banana",
            EventColor::Tangerine => "Tangerine",
            EventColor::Peacock => "Peacock",
            EventColor::Graphite => "Graphite",
            EventColor::Blueberry => "Blueberry",
            EventColor::Basil => "Basil",
            EventColor::Tomato => "Tomato",
        };
        f.write_str(name)
    }
}

/// A timestamp the event cannot be created without
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Departure,
    Arrival,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequiredField::Departure => f.write_str("departure"),
            RequiredField::Arrival => f.write_str("arrival"),
        }
    }
}

/// Journey facts gathered so far from the ticket, flags and prompts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialItinerary {
    pub departure: Option<Instant>,
    pub arrival: Option<Instant>,
    pub duration: Option<JourneyDuration>,
    pub boarding_location: Option<String>,
    pub destination: Option<String>,
    pub travel_type: Option<String>,
    pub color: Option<EventColor>,
}

impl PartialItinerary {
    /// Overwrite every field that is set in `other`, leaving the rest untouched
    pub fn merge_from(&mut self, other: PartialItinerary) {
        if other.departure.is_some() {
            self.departure = other.departure;
        }
        if other.arrival.is_some() {
            self.arrival = other.arrival;
        }
        if other.duration.is_some() {
            self.duration = other.duration;
        }
        if other.boarding_location.is_some() {
            self.boarding_location = other.boarding_location;
        }
        if other.destination.is_some() {
            self.destination = other.destination;
        }
        if other.travel_type.is_some() {
            self.travel_type = other.travel_type;
        }
        if other.color.is_some() {
            self.color = other.color;
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == PartialItinerary::default()
    }
}

/// A complete itinerary ready to be handed to the calendar
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedItinerary {
    departure: Instant,
    arrival: Instant,
    boarding_location: String,
    destination: String,
    travel_type: String,
    color: EventColor,
    summary: String,
}

impl ResolvedItinerary {
    /// Freeze a partial itinerary once both timestamps are known.
    ///
    /// Unset optional fields fall back to empty strings and `default_color`.
    pub fn from_partial(
        partial: PartialItinerary,
        departure: Instant,
        arrival: Instant,
        default_color: EventColor,
        summary: Option<String>,
    ) -> Self {
        let travel_type = partial.travel_type.unwrap_or_default();
        let destination = partial.destination.unwrap_or_default();
        let summary = match summary {
            Some(summary) => summary,
            None => default_summary(&travel_type, &destination),
        };
        Self {
            departure,
            arrival,
            boarding_location: partial.boarding_location.unwrap_or_default(),
            destination,
            travel_type,
            color: partial.color.unwrap_or(default_color),
            summary,
        }
    }

    pub fn departure(&self) -> &Instant {
        &self.departure
    }

    pub fn arrival(&self) -> &Instant {
        &self.arrival
    }

    pub fn duration(&self) -> JourneyDuration {
        JourneyDuration::between(&self.departure, &self.arrival)
            .unwrap_or_default()
    }

    pub fn boarding_location(&self) -> &str {
        &self.boarding_location
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn travel_type(&self) -> &str {
        &self.travel_type
    }

    pub fn color(&self) -> EventColor {
        self.color
    }

    /// Event title
    pub fn summary(&self) -> &str {
        &self.summary
    }
}

const SUMMARY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M %:z";

fn default_summary(travel_type: &str, destination: &str) -> String {
    match (travel_type.is_empty(), destination.is_empty()) {
        (false, false) => format!("{} to {}", travel_type, destination),
        (true, false) => format!("Journey to {}", destination),
        (false, true) => travel_type.to_string(),
        (true, true) => "Ticket".to_string(),
    }
}

impl fmt::Display for ResolvedItinerary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let departure = self.departure.format(SUMMARY_TIME_FORMAT);
        let arrival = self.arrival.format(SUMMARY_TIME_FORMAT);
        writeln!(f, "Event:       {}", self.summary)?;
        writeln!(f, "Departure:   {}", departure)?;
        writeln!(f, "Arrival:     {}", arrival)?;
        writeln!(f, "Duration:    {}", self.duration())?;
        if !self.boarding_location.is_empty() {
            writeln!(f, "Boarding:    {}", self.boarding_location)?;
        }
        if !self.destination.is_empty() {
            writeln!(f, "Destination: {}", self.destination)?;
        }
        if !self.travel_type.is_empty() {
            writeln!(f, "Travel type: {}", self.travel_type)?;
        }
        write!(f, "Color:       {}", self.color)
    }
}
