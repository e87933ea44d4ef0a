//! Calendar provider seam used by the booking pipeline. Google
//! Calendar is the production implementation (see `google::gcal`).

use anyhow::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::booking::TimeSlot;

/// Start or end of an event as the Google Calendar API models it. All
/// day events only have `date`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl EventTime {
    pub fn as_str(&self) -> &str {
        self.date_time
            .as_deref()
            .or(self.date.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// An existing event returned by the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    #[serde(default)]
    pub id: String,
    pub summary: Option<String>,
    pub html_link: Option<String>,
    #[serde(default)]
    pub start: EventTime,
    #[serde(default)]
    pub end: EventTime,
    pub attendees: Option<Vec<Attendee>>,
}

/// Body sent to the provider to create an event
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EventPayload {
    pub summary: String,
    pub description: String,
    pub start: EventTime,
    pub end: EventTime,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attendees: Vec<Attendee>,
}

impl EventPayload {
    /// Builds the payload for `slot`. Start and end are sent as wall
    /// clock times in the slot's zone together with the zone name.
    /// Invitees are trimmed and blank entries dropped.
    pub fn new(summary: &str, description: &str, slot: &TimeSlot, invitees: &[String]) -> Self {
        let time_zone = slot.start.timezone().name().to_string();
        let event_time = |naive: String| EventTime {
            date_time: Some(naive),
            date: None,
            time_zone: Some(time_zone.clone()),
        };

        Self {
            summary: summary.to_string(),
            description: description.to_string(),
            start: event_time(slot.start_local()),
            end: event_time(slot.end_local()),
            attendees: clean_invitees(invitees)
                .into_iter()
                .map(|email| Attendee {
                    email,
                    display_name: None,
                })
                .collect(),
        }
    }
}

pub fn clean_invitees(invitees: &[String]) -> Vec<String> {
    invitees
        .iter()
        .map(|i| i.trim())
        .filter(|i| !i.is_empty())
        .map(String::from)
        .collect()
}

/// The event the provider created. Only the link is surfaced.
#[derive(Debug, Clone)]
pub struct CreatedEvent {
    pub id: String,
    pub link: String,
}

#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Whether a usable, authenticated calendar session exists
    async fn is_authenticated(&self) -> bool;

    /// Events intersecting `[time_min, time_max]`
    async fn list_events(
        &self,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, Error>;

    async fn insert_event(&self, payload: &EventPayload) -> Result<CreatedEvent, Error>;
}
