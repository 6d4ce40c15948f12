use crate::cli::{Cli, FlagOverrides};
use crate::completion::{complete, confirm, CompletionError, CompletionOptions, Prompter};
use crate::config::Config;
use crate::error::ItineraryError;
use crate::itinerary::{PartialItinerary, RequiredField};
use crate::parser::parse_ticket;
use crate::services::{EventSink, TicketUploader};
use crate::ticket::read_ticket_text_or_empty;
use anyhow::Result;
use log::{error, info, warn};
use std::path::{Path, PathBuf};

/// How a run ended when it did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The event was created; carries the link returned by the calendar
    Submitted(String),
    /// The user did not confirm, nothing was created
    Declined,
    /// A required timestamp could not be obtained, nothing was created
    InsufficientData(RequiredField),
}

/// One invocation's worth of input
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    pub ticket: Option<PathBuf>,
    pub overrides: FlagOverrides,
    pub summary: Option<String>,
    pub no_ask: bool,
    pub no_confirm: bool,
    pub upload: bool,
}

impl From<&Cli> for RunRequest {
    fn from(cli: &Cli) -> Self {
        Self {
            ticket: cli.ticket.clone(),
            overrides: FlagOverrides::from(cli),
            summary: cli.summary.clone(),
            no_ask: cli.no_ask,
            no_confirm: cli.no_confirm,
            upload: !cli.no_upload,
        }
    }
}

/// The ticket-to-event pipeline and the collaborators it hands off to
pub struct Application {
    config: Config,
    sink: Box<dyn EventSink>,
    uploader: Option<Box<dyn TicketUploader>>,
    prompter: Box<dyn Prompter>,
}

impl Application {
    pub fn new(config: Config, sink: Box<dyn EventSink>, prompter: Box<dyn Prompter>) -> Self {
        Self {
            config,
            sink,
            uploader: None,
            prompter,
        }
    }

    pub fn with_uploader(mut self, uploader: Box<dyn TicketUploader>) -> Self {
        self.uploader = Some(uploader);
        self
    }

    /// Run extraction, overrides, resolution, completion and confirmation,
    /// then create the event.
    ///
    /// Nothing is sent to the calendar before every earlier step has passed.
    ///
    /// # Errors
    /// Returns a [`crate::cli::FlagError`] for malformed flag values,
    /// [`ItineraryError::InvertedInterval`] for arrival before departure, and
    /// any collaborator failure.
    pub async fn run(&mut self, request: RunRequest) -> Result<RunOutcome> {
        let mut itinerary = match &request.ticket {
            Some(path) => {
                let text = read_ticket_text_or_empty(path);
                let (format, fragment) = parse_ticket(&text);
                info!("Read {} ticket {}", format, path.display());
                fragment
            }
            None => PartialItinerary::default(),
        };

        request.overrides.apply(&mut itinerary)?;

        let options = CompletionOptions {
            no_ask: request.no_ask,
            max_attempts: self.config.prompt.attempts(),
            default_color: self.config.calendar.default_color,
            summary: request.summary.clone(),
        };
        let resolved = match complete(itinerary, &options, self.prompter.as_mut()) {
            Ok(resolved) => resolved,
            Err(CompletionError::Itinerary(ItineraryError::InsufficientData(field))) => {
                println!(
                    "Not enough information to create the event: {} is missing.",
                    field
                );
                return Ok(RunOutcome::InsufficientData(field));
            }
            Err(err) => return Err(err.into()),
        };

        if !confirm(&resolved, request.no_confirm, self.prompter.as_mut())? {
            println!("No event created.");
            return Ok(RunOutcome::Declined);
        }

        let attachment = match (&request.ticket, &self.uploader) {
            (Some(path), Some(uploader)) if request.upload && self.config.drive.upload_tickets => {
                upload_ticket(uploader.as_ref(), path).await
            }
            _ => None,
        };

        let link = self.sink.create_event(&resolved, attachment.as_ref()).await?;
        println!("Added event at {}", link);
        Ok(RunOutcome::Submitted(link))
    }
}

/// A failed upload leaves the event without an attachment instead of blocking it
async fn upload_ticket(
    uploader: &dyn TicketUploader,
    path: &Path,
) -> Option<crate::services::Attachment> {
    if path == Path::new("-") {
        warn!("Ticket came from stdin, nothing to attach");
        return None;
    }
    match uploader.upload(path).await {
        Ok(attachment) => Some(attachment),
        Err(err) => {
            error!("Failed to upload ticket: {:#}", err);
            println!("Could not upload the ticket; the event will be created without it.");
            None
        }
    }
}
