/// Collaborators the resolved itinerary is handed to.
///
/// The pipeline only talks to these traits; the Google implementations are
/// thin HTTP wrappers.
pub mod calendar;
pub mod drive;

use crate::itinerary::ResolvedItinerary;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use once_cell::sync::OnceCell;
use secrecy::SecretString;
use std::env;
use std::path::Path;

pub use calendar::{DryRunSink, GoogleCalendarSink};
pub use drive::GoogleDriveUploader;

/// Environment variable holding an OAuth access token with calendar and drive scopes
pub const ACCESS_TOKEN_VAR: &str = "GOOGLE_ACCESS_TOKEN";

/// A file stored remotely that can be linked from an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_id: String,
    pub file_url: String,
    pub title: String,
    pub mime_type: String,
}

/// Creates the calendar event; called once, as the very last step
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Returns a link to the created event
    async fn create_event(
        &self,
        itinerary: &ResolvedItinerary,
        attachment: Option<&Attachment>,
    ) -> Result<String>;
}

/// Stores the ticket file so the event can link to it
#[async_trait]
pub trait TicketUploader: Send + Sync {
    async fn upload(&self, path: &Path) -> Result<Attachment>;
}

/// OAuth access token, read from the environment the first time a request needs it.
///
/// Runs that stop before submission never look the token up.
#[derive(Debug, Default)]
pub struct AccessToken {
    token: OnceCell<SecretString>,
}

impl AccessToken {
    /// Token taken from [`ACCESS_TOKEN_VAR`] on first use
    pub fn from_env() -> Self {
        Self::default()
    }

    pub fn new(token: SecretString) -> Self {
        Self {
            token: OnceCell::with_value(token),
        }
    }

    pub fn get(&self) -> Result<&SecretString> {
        self.token.get_or_try_init(access_token_from_env)
    }
}

/// Read the access token, loading `.env` first if there is one
pub fn access_token_from_env() -> Result<SecretString> {
    if let Ok(path) = dotenvy::dotenv() {
        log::debug!("Loaded environment from {:?}", path);
    }
    match env::var(ACCESS_TOKEN_VAR) {
        Ok(token) if !token.trim().is_empty() => Ok(SecretString::from(token.trim().to_string())),
        _ => Err(anyhow!(
            "{} is not set. Export an OAuth access token with calendar and drive scopes",
            ACCESS_TOKEN_VAR
        )),
    }
}

/// Guess a MIME type from the file extension
pub fn mime_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_mime_type_for() {
        assert_eq!(mime_type_for(Path::new("ticket.PDF")), "application/pdf");
        assert_eq!(mime_type_for(Path::new("ticket.txt")), "text/plain");
        assert_eq!(
            mime_type_for(Path::new("ticket")),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_preset_token_skips_environment() {
        let token = AccessToken::new(SecretString::from("preset".to_string()));
        assert_eq!(token.get().unwrap().expose_secret(), "preset");
    }
}
