//! Reconciles departure, arrival and duration into one consistent pair.
//!
//! Rules, in order:
//! 1. departure and arrival both known: use them as given, any duration is ignored
//! 2. one timestamp plus a duration: derive the other timestamp
//! 3. anything less: report which timestamps still have to be supplied

use crate::error::ItineraryError;
use crate::itinerary::{Instant, PartialItinerary, RequiredField};
use log::debug;

/// Outcome of resolving a partial itinerary
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Resolved {
        departure: Instant,
        arrival: Instant,
    },
    /// Timestamps that must still be supplied, departure first.
    ///
    /// `missing` always holds at least one field.
    Underdetermined { missing: Vec<RequiredField> },
}

pub fn resolve(itinerary: &PartialItinerary) -> Result<Resolution, ItineraryError> {
    let resolution = match (itinerary.departure, itinerary.arrival, itinerary.duration) {
        (Some(departure), Some(arrival), _) => {
            if arrival < departure {
                return Err(ItineraryError::InvertedInterval { departure, arrival });
            }
            Resolution::Resolved { departure, arrival }
        }
        (Some(departure), None, Some(duration)) => Resolution::Resolved {
            departure,
            arrival: departure + duration.as_chrono(),
        },
        (None, Some(arrival), Some(duration)) => Resolution::Resolved {
            departure: arrival - duration.as_chrono(),
            arrival,
        },
        (Some(_), None, None) => Resolution::Underdetermined {
            missing: vec![RequiredField::Arrival],
        },
        (None, Some(_), None) | (None, None, Some(_)) => Resolution::Underdetermined {
            missing: vec![RequiredField::Departure],
        },
        (None, None, None) => Resolution::Underdetermined {
            missing: vec![RequiredField::Departure, RequiredField::Arrival],
        },
    };
    debug!("Resolved itinerary times: {:?}", resolution);
    Ok(resolution)
}
