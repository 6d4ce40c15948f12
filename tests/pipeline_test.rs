use anyhow::{anyhow, Result};
use async_trait::async_trait;
use clap::Parser;
use std::collections::VecDeque;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;
use tripcal::app::{Application, RunOutcome, RunRequest};
use tripcal::cli::{Cli, FlagError};
use tripcal::completion::{CompletionError, Prompter};
use tripcal::config::Config;
use tripcal::itinerary::RequiredField;
use tripcal::services::{Attachment, EventSink, TicketUploader};
use tripcal::{EventColor, ItineraryError, ResolvedItinerary};

const IRCTC_TICKET: &str = "Electronic Reservation Slip (ERS)
Booked From
To
NEW DELHI (NDLS)
Boarding At
NEW DELHI (NDLS)
MUMBAI CENTRAL (MMCT)
Start Date* 14-Jan-2025 Departure* 13:50 14-Jan-2025 Arrival* 08:35 15-Jan-2025
IRCTC Convenience Fee (Incl. of GST)
";

const EVENT_LINK: &str = "https://calendar.example/event/1";

type Submitted = Arc<Mutex<Vec<(ResolvedItinerary, Option<Attachment>)>>>;

#[derive(Default, Clone)]
struct RecordingSink {
    submitted: Submitted,
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn create_event(
        &self,
        itinerary: &ResolvedItinerary,
        attachment: Option<&Attachment>,
    ) -> Result<String> {
        self.submitted
            .lock()
            .unwrap()
            .push((itinerary.clone(), attachment.cloned()));
        Ok(EVENT_LINK.to_string())
    }
}

struct FakeUploader {
    fail: bool,
}

#[async_trait]
impl TicketUploader for FakeUploader {
    async fn upload(&self, path: &Path) -> Result<Attachment> {
        if self.fail {
            return Err(anyhow!("quota exceeded"));
        }
        Ok(Attachment {
            file_id: "file-1".to_string(),
            file_url: "https://drive.example/file-1".to_string(),
            title: path.file_name().unwrap().to_string_lossy().into_owned(),
            mime_type: "text/plain".to_string(),
        })
    }
}

struct Scripted(VecDeque<String>);

impl Scripted {
    fn new(replies: &[&str]) -> Box<Self> {
        Box::new(Self(replies.iter().map(|r| r.to_string()).collect()))
    }
}

impl Prompter for Scripted {
    fn ask(&mut self, _prompt: &str) -> Result<Option<String>> {
        Ok(self.0.pop_front())
    }
}

fn request(args: &[&str]) -> RunRequest {
    let argv = std::iter::once("tripcal").chain(args.iter().copied());
    RunRequest::from(&Cli::try_parse_from(argv).unwrap())
}

fn application(sink: &RecordingSink, replies: &[&str]) -> Application {
    Application::new(
        Config::default(),
        Box::new(sink.clone()),
        Scripted::new(replies),
    )
}

fn wall_clock(instant: &tripcal::itinerary::Instant) -> String {
    instant.format("%Y-%m-%d %H:%M").to_string()
}

#[tokio::test]
async fn test_departure_and_duration_flags_resolve_arrival() -> Result<()> {
    let sink = RecordingSink::default();
    let mut app = application(&sink, &[]);

    let outcome = app
        .run(request(&[
            "--departure=2025-01-14 13:50",
            "--duration=06:15",
            "--no-confirm",
        ]))
        .await?;

    assert_eq!(outcome, RunOutcome::Submitted(EVENT_LINK.to_string()));
    let submitted = sink.submitted.lock().unwrap();
    assert_eq!(submitted.len(), 1);
    assert_eq!(wall_clock(submitted[0].0.departure()), "2025-01-14 13:50");
    assert_eq!(wall_clock(submitted[0].0.arrival()), "2025-01-14 20:05");
    Ok(())
}

#[tokio::test]
async fn test_ignored_malformed_duration_is_never_parsed() -> Result<()> {
    let sink = RecordingSink::default();
    let mut app = application(&sink, &[]);

    let outcome = app
        .run(request(&[
            "--departure",
            "2025-01-14 13:50",
            "--arrival",
            "2025-01-14 20:05",
            "--duration",
            "99:99",
            "--no-confirm",
        ]))
        .await?;

    assert!(matches!(outcome, RunOutcome::Submitted(_)));
    let submitted = sink.submitted.lock().unwrap();
    assert_eq!(wall_clock(submitted[0].0.departure()), "2025-01-14 13:50");
    assert_eq!(wall_clock(submitted[0].0.arrival()), "2025-01-14 20:05");
    Ok(())
}

#[tokio::test]
async fn test_no_ask_with_unknown_ticket_is_insufficient_data() -> Result<()> {
    let mut ticket = NamedTempFile::new()?;
    writeln!(ticket, "Thank you for shopping with us\nOrder #12345")?;
    let sink = RecordingSink::default();
    let mut app = application(&sink, &[])
        .with_uploader(Box::new(FakeUploader { fail: false }));

    let ticket_path = ticket.path().to_string_lossy().into_owned();
    let outcome = app.run(request(&[&ticket_path, "--no-ask"])).await?;

    assert_eq!(
        outcome,
        RunOutcome::InsufficientData(RequiredField::Departure)
    );
    assert!(sink.submitted.lock().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_malformed_duration_flag_is_a_flag_error() {
    let sink = RecordingSink::default();
    let mut app = application(&sink, &[]);

    let err = app
        .run(request(&["--departure=2025-01-14 13:50", "--duration=6h15"]))
        .await
        .unwrap_err();

    let flag_err = err.downcast_ref::<FlagError>().expect("flag error");
    assert_eq!(flag_err.flag, "duration");
    assert_eq!(
        flag_err.source,
        ItineraryError::MalformedDuration("6h15".to_string())
    );
    assert!(sink.submitted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_inverted_flags_abort() {
    let sink = RecordingSink::default();
    let mut app = application(&sink, &["y"]);

    let err = app
        .run(request(&[
            "--departure=2025-01-14 20:05",
            "--arrival=2025-01-14 13:50",
        ]))
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<CompletionError>(),
        Some(CompletionError::Itinerary(ItineraryError::InvertedInterval { .. }))
    ));
    assert!(sink.submitted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_irctc_ticket_with_flag_override_and_upload() -> Result<()> {
    let mut ticket = NamedTempFile::new()?;
    write!(ticket, "{}", IRCTC_TICKET)?;
    let sink = RecordingSink::default();
    let mut app = application(&sink, &["yes"])
        .with_uploader(Box::new(FakeUploader { fail: false }));

    let ticket_path = ticket.path().to_string_lossy().into_owned();
    let outcome = app
        .run(request(&[&ticket_path, "--destination=Mumbai", "--color", "tomato"]))
        .await?;

    assert!(matches!(outcome, RunOutcome::Submitted(_)));
    let submitted = sink.submitted.lock().unwrap();
    let (itinerary, attachment) = &submitted[0];
    assert_eq!(wall_clock(itinerary.departure()), "2025-01-14 13:50");
    assert_eq!(wall_clock(itinerary.arrival()), "2025-01-15 08:35");
    assert_eq!(itinerary.boarding_location(), "NEW DELHI");
    assert_eq!(itinerary.destination(), "Mumbai");
    assert_eq!(itinerary.travel_type(), "Train");
    assert_eq!(itinerary.color(), EventColor::Tomato);
    assert_eq!(itinerary.summary(), "Train to Mumbai");
    let file_id = attachment.as_ref().map(|a| a.file_id.as_str());
    assert_eq!(file_id, Some("file-1"));
    Ok(())
}

#[tokio::test]
async fn test_failed_upload_still_creates_event() -> Result<()> {
    let mut ticket = NamedTempFile::new()?;
    write!(ticket, "{}", IRCTC_TICKET)?;
    let sink = RecordingSink::default();
    let mut app = application(&sink, &[])
        .with_uploader(Box::new(FakeUploader { fail: true }));

    let ticket_path = ticket.path().to_string_lossy().into_owned();
    let outcome = app.run(request(&[&ticket_path, "--no-confirm"])).await?;

    assert!(matches!(outcome, RunOutcome::Submitted(_)));
    assert!(sink.submitted.lock().unwrap()[0].1.is_none());
    Ok(())
}

#[tokio::test]
async fn test_no_upload_flag_skips_attachment() -> Result<()> {
    let mut ticket = NamedTempFile::new()?;
    write!(ticket, "{}", IRCTC_TICKET)?;
    let sink = RecordingSink::default();
    let mut app = application(&sink, &[])
        .with_uploader(Box::new(FakeUploader { fail: false }));

    let ticket_path = ticket.path().to_string_lossy().into_owned();
    let args = [ticket_path.as_str(), "--no-confirm", "--no-upload"];
    app.run(request(&args)).await?;

    assert!(sink.submitted.lock().unwrap()[0].1.is_none());
    Ok(())
}

#[tokio::test]
async fn test_declined_confirmation_creates_nothing() -> Result<()> {
    let sink = RecordingSink::default();
    let mut app = application(&sink, &["n"]);

    let outcome = app
        .run(request(&[
            "--departure=2025-01-14 13:50",
            "--arrival=2025-01-14 20:05",
        ]))
        .await?;

    assert_eq!(outcome, RunOutcome::Declined);
    assert!(sink.submitted.lock().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_prompts_fill_missing_arrival() -> Result<()> {
    let sink = RecordingSink::default();
    let mut config = Config::default();
    config.calendar.default_color = EventColor::Grape;
    let mut app = Application::new(
        config,
        Box::new(sink.clone()),
        Scripted::new(&["not a time", "06:15", "y"]),
    );

    let args = ["--departure=2025-01-14 13:50", "--travel-type=Bus"];
    let outcome = app.run(request(&args)).await?;

    assert!(matches!(outcome, RunOutcome::Submitted(_)));
    let submitted = sink.submitted.lock().unwrap();
    assert_eq!(wall_clock(submitted[0].0.arrival()), "2025-01-14 20:05");
    assert_eq!(submitted[0].0.color(), EventColor::Grape);
    assert_eq!(submitted[0].0.summary(), "Bus");
    Ok(())
}
