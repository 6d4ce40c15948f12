//! Interactive completion of missing journey times and the confirmation gate.

use crate::error::ItineraryError;
use crate::itinerary::{
    EventColor, Instant, JourneyDuration, PartialItinerary, RequiredField, ResolvedItinerary,
};
use crate::parser::{parse_duration, parse_instant};
use crate::resolver::{resolve, Resolution};
use anyhow::Result;
use log::{debug, info, warn};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Source of interactive answers.
///
/// `Ok(None)` means the input ended (end-of-file or interrupt) and no more
/// answers will come.
pub trait Prompter {
    fn ask(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Terminal prompter backed by rustyline
pub struct RustylinePrompter {
    editor: DefaultEditor,
}

impl RustylinePrompter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl Prompter for RustylinePrompter {
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

/// Switches and defaults applied while completing an itinerary
#[derive(Debug, Clone)]
pub struct CompletionOptions {
    pub no_ask: bool,
    pub max_attempts: u32,
    pub default_color: EventColor,
    pub summary: Option<String>,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            no_ask: false,
            max_attempts: crate::config::DEFAULT_MAX_ATTEMPTS,
            default_color: EventColor::default(),
            summary: None,
        }
    }
}

/// Why completion stopped without an itinerary
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error(transparent)]
    Itinerary(#[from] ItineraryError),
    #[error("Failed to read from the terminal: {0}")]
    Prompt(anyhow::Error),
}

/// Ask for every timestamp the resolver still lacks, then freeze the itinerary.
///
/// With `no_ask` set, the first missing field ends completion with
/// `InsufficientData`. A reply that fails to parse is asked again, up to
/// `max_attempts` times per field.
pub fn complete(
    mut itinerary: PartialItinerary,
    options: &CompletionOptions,
    prompter: &mut dyn Prompter,
) -> Result<ResolvedItinerary, CompletionError> {
    loop {
        let missing = match resolve(&itinerary)? {
            Resolution::Resolved { departure, arrival } => {
                info!("Journey runs from {} to {}", departure, arrival);
                return Ok(ResolvedItinerary::from_partial(
                    itinerary,
                    departure,
                    arrival,
                    options.default_color,
                    options.summary.clone(),
                ));
            }
            Resolution::Underdetermined { missing } => missing,
        };
        debug!("Still missing: {:?}", missing);

        // Never empty; only the first is asked before resolving again
        let field = missing[0];
        if options.no_ask {
            warn!("Not asking for the {} because prompting is disabled", field);
            return Err(ItineraryError::InsufficientData(field).into());
        }

        match field {
            RequiredField::Departure => {
                let departure = ask_with_retry(prompter, options, field, parse_instant)?;
                itinerary.departure = Some(departure);
            }
            RequiredField::Arrival => {
                match ask_with_retry(prompter, options, field, parse_arrival_reply)? {
                    ArrivalReply::At(arrival) => itinerary.arrival = Some(arrival),
                    ArrivalReply::After(duration) => itinerary.duration = Some(duration),
                }
            }
        }
    }
}

enum ArrivalReply {
    At(Instant),
    After(JourneyDuration),
}

/// An arrival prompt accepts either a timestamp or a journey duration
fn parse_arrival_reply(reply: &str) -> Result<ArrivalReply, ItineraryError> {
    match parse_instant(reply) {
        Ok(arrival) => Ok(ArrivalReply::At(arrival)),
        Err(timestamp_err) => parse_duration(reply)
            .map(ArrivalReply::After)
            .map_err(|_| timestamp_err),
    }
}

fn prompt_text(field: RequiredField) -> &'static str {
    match field {
        RequiredField::Departure => {
            "Enter departure date and time (YYYY-MM-DD HH:MM[:SS][+HH:MM]): "
        }
        RequiredField::Arrival => {
            "Enter arrival (YYYY-MM-DD HH:MM[:SS][+HH:MM]) or journey duration (HH:MM): "
        }
    }
}

fn ask_with_retry<T>(
    prompter: &mut dyn Prompter,
    options: &CompletionOptions,
    field: RequiredField,
    parse: impl Fn(&str) -> Result<T, ItineraryError>,
) -> Result<T, CompletionError> {
    let attempts = options.max_attempts.max(1);
    for attempt in 1..=attempts {
        let reply = match prompter
            .ask(prompt_text(field))
            .map_err(CompletionError::Prompt)?
        {
            Some(reply) => reply,
            None => {
                info!("Input ended while asking for the {}", field);
                return Err(ItineraryError::InsufficientData(field).into());
            }
        };
        match parse(&reply) {
            Ok(value) => return Ok(value),
            Err(err) if err.is_malformed_input() => {
                println!("{}", err);
                warn!(
                    "Attempt {}/{} for {} rejected: {}",
                    attempt, attempts, field, err
                );
            }
            Err(err) => return Err(err.into()),
        }
    }
    Err(ItineraryError::InsufficientData(field).into())
}

/// Show the itinerary and ask whether to create the event.
///
/// Returns `true` to go ahead. With `no_confirm` the question is skipped.
pub fn confirm(
    itinerary: &ResolvedItinerary,
    no_confirm: bool,
    prompter: &mut dyn Prompter,
) -> Result<bool> {
    println!("{}", itinerary);
    if no_confirm {
        return Ok(true);
    }

    let reply = prompter.ask("Create this event? [y/N]: ")?;
    let accepted = reply
        .map(|r| matches!(r.trim().to_lowercase().as_str(), "y" | "yes"))
        .unwrap_or(false);
    if !accepted {
        info!("Event creation declined");
    }
    Ok(accepted)
}
