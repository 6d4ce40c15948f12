//! Extractor traits and provider types for the ticket parser.

use crate::itinerary::PartialItinerary;
use std::fmt;

/// Ticket layouts the parser knows how to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderFormat {
    Irctc,
    MakeMyTrip,
    Unknown,
}

impl ProviderFormat {
    /// Travel type recorded for tickets from this provider
    pub fn travel_type(&self) -> Option<&'static str> {
        match self {
            ProviderFormat::Irctc => Some("Train"),
            ProviderFormat::MakeMyTrip => Some("Flight"),
            ProviderFormat::Unknown => None,
        }
    }
}

impl fmt::Display for ProviderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderFormat::Irctc => f.write_str("IRCTC"),
            ProviderFormat::MakeMyTrip => f.write_str("MakeMyTrip"),
            ProviderFormat::Unknown => f.write_str("unknown"),
        }
    }
}

/// Pulls whatever journey fields it can find out of one provider's ticket text.
///
/// Fields are located independently: a field that cannot be found is left
/// unset and never prevents the others from being read.
pub trait FieldExtractor {
    fn extract(&self, text: &str) -> PartialItinerary;
}
