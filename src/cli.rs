use crate::error::ItineraryError;
use crate::itinerary::{EventColor, PartialItinerary};
use crate::parser::{parse_duration, parse_instant};
use clap::Parser;
use log::debug;
use std::path::PathBuf;

/// tripcal - turn a train or flight ticket into a calendar event
#[derive(Debug, Default, Parser)]
#[command(name = "tripcal")]
#[command(about = "Create a calendar event from an IRCTC or MakeMyTrip ticket", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Ticket text file to read journey details from ("-" reads stdin)
    pub ticket: Option<PathBuf>,

    /// Departure (YYYY-MM-DD HH:MM[:SS][+HH:MM]); local time when no offset is given
    #[arg(long)]
    pub departure: Option<String>,

    /// Arrival (YYYY-MM-DD HH:MM[:SS][+HH:MM]); local time when no offset is given
    #[arg(long)]
    pub arrival: Option<String>,

    /// Journey duration (HH:MM); ignored when both departure and arrival are known
    #[arg(long)]
    pub duration: Option<String>,

    /// Where the journey starts
    #[arg(long, alias = "from")]
    pub boarding: Option<String>,

    /// Where the journey ends
    #[arg(long, alias = "to")]
    pub destination: Option<String>,

    /// Mode of travel shown in the event title (Train, Flight, Bus, ...)
    #[arg(long = "travel-type", alias = "type")]
    pub travel_type: Option<String>,

    /// Event colour
    #[arg(long, value_enum, ignore_case = true)]
    pub color: Option<EventColor>,

    /// Event title, instead of the generated "<travel type> to <destination>"
    #[arg(long)]
    pub summary: Option<String>,

    /// Never prompt; give up if departure or arrival cannot be determined
    #[arg(long = "no-ask")]
    pub no_ask: bool,

    /// Create the event without asking for confirmation
    #[arg(long = "no-confirm")]
    pub no_confirm: bool,

    /// Do not upload the ticket file and attach it to the event
    #[arg(long = "no-upload")]
    pub no_upload: bool,

    /// Print the event that would be created instead of creating it
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Configuration file to use instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// A flag value that could not be parsed
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid value for '--{flag}': {source}")]
pub struct FlagError {
    pub flag: &'static str,
    #[source]
    pub source: ItineraryError,
}

/// Journey values given on the command line, still in their raw form
#[derive(Debug, Clone, Default)]
pub struct FlagOverrides {
    pub departure: Option<String>,
    pub arrival: Option<String>,
    pub duration: Option<String>,
    pub boarding: Option<String>,
    pub destination: Option<String>,
    pub travel_type: Option<String>,
    pub color: Option<EventColor>,
}

impl From<&Cli> for FlagOverrides {
    fn from(cli: &Cli) -> Self {
        Self {
            departure: cli.departure.clone(),
            arrival: cli.arrival.clone(),
            duration: cli.duration.clone(),
            boarding: cli.boarding.clone(),
            destination: cli.destination.clone(),
            travel_type: cli.travel_type.clone(),
            color: cli.color,
        }
    }
}

impl FlagOverrides {
    /// Overwrite extracted values with the ones given as flags.
    ///
    /// `--duration` is only parsed when it can matter, i.e. when departure and
    /// arrival are not both known once the other flags are applied.
    pub fn apply(self, itinerary: &mut PartialItinerary) -> Result<(), FlagError> {
        let mut flags = PartialItinerary {
            departure: parse_flag("departure", self.departure.as_deref(), parse_instant)?,
            arrival: parse_flag("arrival", self.arrival.as_deref(), parse_instant)?,
            boarding_location: self.boarding,
            destination: self.destination,
            travel_type: self.travel_type,
            color: self.color,
            ..Default::default()
        };

        let both_known = flags.departure.or(itinerary.departure).is_some()
            && flags.arrival.or(itinerary.arrival).is_some();
        if both_known {
            if self.duration.is_some() {
                debug!("Departure and arrival both known, ignoring --duration");
            }
        } else {
            flags.duration = parse_flag("duration", self.duration.as_deref(), parse_duration)?;
        }

        itinerary.merge_from(flags);
        Ok(())
    }
}

fn parse_flag<T>(
    flag: &'static str,
    raw: Option<&str>,
    parse: impl Fn(&str) -> Result<T, ItineraryError>,
) -> Result<Option<T>, FlagError> {
    raw.map(parse)
        .transpose()
        .map_err(|source| FlagError { flag, source })
}
