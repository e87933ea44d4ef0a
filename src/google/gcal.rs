//! Google Calendar API v3 client

use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;

use super::auth::GoogleAuth;
use crate::calendar::{CalendarEvent, CalendarProvider, CreatedEvent, EventPayload};
use crate::core::AppConfig;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventListResponse {
    #[serde(default)]
    items: Vec<CalendarEvent>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InsertResponse {
    id: String,
    html_link: Option<String>,
}

fn events_url(api_base: &str, calendar_id: &str) -> String {
    format!(
        "{}/calendar/v3/calendars/{}/events",
        api_base.trim_end_matches('/'),
        urlencoding::encode(calendar_id)
    )
}

/// List events intersecting `[time_min, time_max]`, following pagination.
/// Recurring events are expanded into single instances.
pub async fn list_events(
    access_token: &str,
    api_base: &str,
    calendar_id: &str,
    time_min: DateTime<Utc>,
    time_max: DateTime<Utc>,
    timeout: Duration,
) -> Result<Vec<CalendarEvent>> {
    let client = reqwest::Client::new();
    let url = events_url(api_base, calendar_id);
    let time_min = time_min.to_rfc3339_opts(SecondsFormat::Secs, true);
    let time_max = time_max.to_rfc3339_opts(SecondsFormat::Secs, true);

    let mut events = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let mut request = client
            .get(&url)
            .bearer_auth(access_token)
            .timeout(timeout)
            .query(&[
                ("timeMin", time_min.as_str()),
                ("timeMax", time_max.as_str()),
                ("singleEvents", "true"),
                ("orderBy", "startTime"),
                ("maxResults", "250"),
            ]);
        if let Some(token) = &page_token {
            request = request.query(&[("pageToken", token.as_str())]);
        }

        let resp = request.send().await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("Listing events failed with {}: {}", status, body));
        }

        let page: EventListResponse = resp.json().await?;
        events.extend(page.items);

        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    Ok(events)
}

pub async fn insert_event(
    access_token: &str,
    api_base: &str,
    calendar_id: &str,
    payload: &EventPayload,
    timeout: Duration,
) -> Result<CreatedEvent> {
    let resp = reqwest::Client::new()
        .post(events_url(api_base, calendar_id))
        .bearer_auth(access_token)
        .timeout(timeout)
        .json(payload)
        .send()
        .await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(anyhow!("Creating event failed with {}: {}", status, body));
    }

    let created: InsertResponse = resp.json().await?;
    let link = created
        .html_link
        .ok_or(anyhow!("Created event {} has no link", created.id))?;

    Ok(CreatedEvent {
        id: created.id,
        link,
    })
}

/// `CalendarProvider` backed by one Google calendar
#[derive(Clone)]
pub struct GoogleCalendar {
    auth: GoogleAuth,
    api_base: String,
    calendar_id: String,
    timeout: Duration,
}

impl GoogleCalendar {
    pub fn new(auth: GoogleAuth, config: &AppConfig) -> Self {
        Self {
            auth,
            api_base: config.google_api_url.clone(),
            calendar_id: config.calendar_id.clone(),
            timeout: config.calendar_timeout,
        }
    }
}

#[async_trait]
impl CalendarProvider for GoogleCalendar {
    async fn is_authenticated(&self) -> bool {
        match self.auth.access_token().await {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!("Calendar is not authenticated: {:#}", err);
                false
            }
        }
    }

    async fn list_events(
        &self,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, Error> {
        let access_token = self.auth.access_token().await?;
        list_events(
            &access_token,
            &self.api_base,
            &self.calendar_id,
            time_min,
            time_max,
            self.timeout,
        )
        .await
    }

    async fn insert_event(&self, payload: &EventPayload) -> Result<CreatedEvent, Error> {
        let access_token = self.auth.access_token().await?;
        insert_event(
            &access_token,
            &self.api_base,
            &self.calendar_id,
            payload,
            self.timeout,
        )
        .await
    }
}
