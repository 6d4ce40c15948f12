//! Error taxonomy for itinerary extraction and resolution.

use crate::itinerary::RequiredField;
use chrono::{DateTime, FixedOffset};

/// Errors raised while turning ticket text and flags into an itinerary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItineraryError {
    #[error(
        "Invalid date/time '{0}'. Expected YYYY-MM-DD HH:MM[:SS] optionally followed by +HH:MM"
    )]
    MalformedTimestamp(String),
    #[error("Invalid duration '{0}'. Expected HH:MM with minutes below 60")]
    MalformedDuration(String),
    #[error("Arrival {arrival} is before departure {departure}")]
    InvertedInterval {
        departure: DateTime<FixedOffset>,
        arrival: DateTime<FixedOffset>,
    },
    #[error("Not enough information to create the event: {0} is missing")]
    InsufficientData(RequiredField),
}

impl ItineraryError {
    /// Parser-level errors are the ones a re-prompt can recover from
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Self::MalformedTimestamp(_) | Self::MalformedDuration(_)
        )
    }
}
