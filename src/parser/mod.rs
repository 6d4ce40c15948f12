/// Ticket parser module
///
/// Detects which provider issued a ticket and extracts journey fields from
/// its text layout.
pub mod irctc;
pub mod makemytrip;
pub mod time;
pub mod traits;

use crate::itinerary::PartialItinerary;
use log::{debug, info};

pub use time::{format_instant, parse_duration, parse_instant};
pub use traits::{FieldExtractor, ProviderFormat};

/// Markers checked in priority order; the first provider with a hit wins
const IRCTC_MARKERS: &[&str] = &["IRCTC", "Electronic Reservation Slip"];
const MAKEMYTRIP_MARKERS: &[&str] = &["makemytrip"];

/// Classify ticket text by the provider markers it contains
pub fn detect_format(text: &str) -> ProviderFormat {
    if IRCTC_MARKERS.iter().any(|marker| text.contains(marker)) {
        return ProviderFormat::Irctc;
    }

    let lowered = text.to_lowercase();
    if MAKEMYTRIP_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        return ProviderFormat::MakeMyTrip;
    }

    ProviderFormat::Unknown
}

/// Run the extractor matching `format` over `text`
pub fn extract(format: ProviderFormat, text: &str) -> PartialItinerary {
    let text = text.replace("\r\n", "\n");
    let fragment = match format {
        ProviderFormat::Irctc => irctc::IrctcExtractor.extract(&text),
        ProviderFormat::MakeMyTrip => makemytrip::MakeMyTripExtractor.extract(&text),
        ProviderFormat::Unknown => {
            debug!("Ticket format not recognised, nothing extracted");
            PartialItinerary::default()
        }
    };
    debug!("Extracted from {} ticket: {:?}", format, fragment);
    fragment
}

/// Detect the provider and extract in one step
pub fn parse_ticket(text: &str) -> (ProviderFormat, PartialItinerary) {
    let format = detect_format(text);
    info!("Detected ticket format: {}", format);
    (format, extract(format, text))
}
