pub mod app;
pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod itinerary;
pub mod parser;
pub mod resolver;
pub mod services;
pub mod ticket;

use anyhow::Result;
use log::*;
use std::sync::Arc;

/// Wire the real collaborators to the pipeline and run it for `cli`
pub async fn run(cli: &cli::Cli) -> Result<app::RunOutcome> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    debug!("Using configuration: {:?}", config);

    let prompter = Box::new(completion::RustylinePrompter::new()?);
    let mut application = if cli.dry_run {
        info!("Dry run, the event will only be printed");
        app::Application::new(config, Box::new(services::DryRunSink), prompter)
    } else {
        // Looked up on first request, so runs that stop early need no credentials
        let token = Arc::new(services::AccessToken::from_env());
        let uploader =
            services::GoogleDriveUploader::new(Arc::clone(&token), config.drive.folder_id.clone());
        let sink = services::GoogleCalendarSink::new(token, config.calendar.calendar_id.clone())?;
        app::Application::new(config, Box::new(sink), prompter)
            .with_uploader(Box::new(uploader))
    };

    application.run(app::RunRequest::from(cli)).await
}

pub fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "{} [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();
}

// Re-export commonly used types
pub use config::Config;
pub use error::ItineraryError;
pub use itinerary::{EventColor, JourneyDuration, PartialItinerary, ResolvedItinerary};
