use super::{AccessToken, Attachment, EventSink};
use crate::itinerary::ResolvedItinerary;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Client, Url};
use secrecy::ExposeSecret;
use serde_json::{json, Value};
use std::sync::Arc;

const CALENDAR_API: &str = "https://www.googleapis.com/calendar/v3/";

/// Build the event resource sent to the calendar API
pub fn event_body(itinerary: &ResolvedItinerary, attachment: Option<&Attachment>) -> Value {
    let mut description = Vec::new();
    if !itinerary.boarding_location().is_empty() {
        description.push(format!("From: {}", itinerary.boarding_location()));
    }
    if !itinerary.destination().is_empty() {
        description.push(format!("To: {}", itinerary.destination()));
    }
    description.push(format!("Duration: {}", itinerary.duration()));

    let mut body = json!({
        "summary": itinerary.summary(),
        "description": description.join("\n"),
        "start": { "dateTime": itinerary.departure().to_rfc3339() },
        "end": { "dateTime": itinerary.arrival().to_rfc3339() },
        "colorId": itinerary.color().color_id().to_string(),
    });
    if !itinerary.boarding_location().is_empty() {
        body["location"] = json!(itinerary.boarding_location());
    }
    if let Some(attachment) = attachment {
        body["attachments"] = json!([{
            "fileUrl": attachment.file_url,
            "fileId": attachment.file_id,
            "title": attachment.title,
            "mimeType": attachment.mime_type,
        }]);
    }
    body
}

/// Inserts events through the Google Calendar REST API
pub struct GoogleCalendarSink {
    client: Client,
    token: Arc<AccessToken>,
    calendar_id: String,
    base_url: Url,
}

impl GoogleCalendarSink {
    pub fn new(token: Arc<AccessToken>, calendar_id: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            token,
            calendar_id: calendar_id.into(),
            base_url: Url::parse(CALENDAR_API)?,
        })
    }

    fn events_url(&self) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Calendar API URL cannot take a path"))?
            .pop_if_empty()
            .extend(["calendars", self.calendar_id.as_str(), "events"]);
        url.query_pairs_mut()
            .append_pair("supportsAttachments", "true");
        Ok(url)
    }
}

#[async_trait]
impl EventSink for GoogleCalendarSink {
    async fn create_event(
        &self,
        itinerary: &ResolvedItinerary,
        attachment: Option<&Attachment>,
    ) -> Result<String> {
        let url = self.events_url()?;
        let body = event_body(itinerary, attachment);
        debug!("Creating event at {}: {}", url, body);

        let response = self
            .client
            .post(url)
            .bearer_auth(self.token.get()?.expose_secret())
            .json(&body)
            .send()
            .await
            .context("Failed to reach the calendar API")?;

        let status = response.status();
        let payload = response
            .json::<Value>()
            .await
            .context("Invalid calendar API response")?;
        if !status.is_success() {
            return Err(anyhow!(
                "Calendar API returned {}: {}",
                status,
                payload["error"]["message"]
                    .as_str()
                    .unwrap_or("unknown error")
            ));
        }

        let link = payload["htmlLink"]
            .as_str()
            .ok_or_else(|| anyhow!("Calendar API response has no event link"))?;
        info!("Created event {}", link);
        Ok(link.to_string())
    }
}

/// Prints the event instead of creating it
pub struct DryRunSink;

#[async_trait]
impl EventSink for DryRunSink {
    async fn create_event(
        &self,
        itinerary: &ResolvedItinerary,
        attachment: Option<&Attachment>,
    ) -> Result<String> {
        let body = event_body(itinerary, attachment);
        println!("{}", serde_json::to_string_pretty(&body)?);
        Ok("(dry run, no event created)".to_string())
    }
}
