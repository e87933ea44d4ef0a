//! In-memory calendar used by the booking unit tests

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::calendar::{CalendarEvent, CalendarProvider, CreatedEvent, EventPayload, EventTime};

#[derive(Default)]
pub struct FakeCalendar {
    pub authenticated: bool,
    pub list_fails: bool,
    pub insert_fails: bool,
    pub events: Vec<CalendarEvent>,
    pub list_calls: AtomicUsize,
    pub insert_calls: AtomicUsize,
    pub inserted: Mutex<Vec<EventPayload>>,
}

impl FakeCalendar {
    pub fn free() -> Self {
        Self {
            authenticated: true,
            ..Default::default()
        }
    }

    pub fn busy() -> Self {
        Self {
            authenticated: true,
            events: vec![CalendarEvent {
                id: String::from("busy"),
                summary: Some(String::from("Standup")),
                html_link: None,
                start: EventTime::default(),
                end: EventTime::default(),
                attendees: None,
            }],
            ..Default::default()
        }
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CalendarProvider for FakeCalendar {
    async fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    async fn list_events(
        &self,
        _time_min: DateTime<Utc>,
        _time_max: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, Error> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.list_fails {
            return Err(anyhow!("connection refused"));
        }
        Ok(self.events.clone())
    }

    async fn insert_event(&self, payload: &EventPayload) -> Result<CreatedEvent, Error> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        if self.insert_fails {
            return Err(anyhow!("403 Forbidden"));
        }
        self.inserted.lock().unwrap().push(payload.clone());
        Ok(CreatedEvent {
            id: String::from("evt_1"),
            link: String::from("https://calendar.google.com/event?eid=evt_1"),
        })
    }
}
