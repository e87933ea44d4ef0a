//! Test utilities for integration tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use axum::{Router, body::Body};
use chrono::{DateTime, Utc};
use tempfile::TempDir;
use tokio_rusqlite::Connection;

use slotbot::ai::LanguageModel;
use slotbot::api::{AppState, app, google_auth};
use slotbot::booking::BookingPipeline;
use slotbot::calendar::{
    CalendarEvent, CalendarProvider, CreatedEvent, EventPayload, EventTime,
};
use slotbot::core::AppConfig;
use slotbot::core::db::initialized_db;
use slotbot::openai::Message;

/// Model reply for "Book a meeting tomorrow at 3pm with a@x.com" on
/// 2024-06-10
pub const BOOKING_REPLY: &str = r#"Sure! Here is the JSON:
```json
{"start_time": "2024-06-11T15:00:00", "end_time": "2024-06-11T15:30:00", "invitees": ["a@x.com"]}
```"#;

pub const EVENT_LINK: &str = "https://www.google.com/calendar/event?eid=evt_1";

/// Language model that always answers with the same text
pub struct FakeModel {
    reply: Result<String, String>,
    calls: AtomicUsize,
}

impl FakeModel {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(err: &str) -> Self {
        Self {
            reply: Err(err.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LanguageModel for FakeModel {
    async fn complete(&self, _messages: &[Message]) -> Result<String, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().map_err(|e| anyhow!(e))
    }
}

/// In-memory calendar that records every call
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

    /// A calendar with one event covering 15:00 to 16:00 on 2024-06-11
    pub fn busy() -> Self {
        Self {
            authenticated: true,
            events: vec![event("standup", "2024-06-11T15:00:00+05:30", "2024-06-11T16:00:00+05:30")],
            ..Default::default()
        }
    }

    pub fn unauthenticated() -> Self {
        Self::default()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.list_calls() + self.insert_calls()
    }
}

pub fn event(id: &str, start: &str, end: &str) -> CalendarEvent {
    CalendarEvent {
        id: id.to_string(),
        summary: Some(String::from("Standup")),
        html_link: Some(format!("https://www.google.com/calendar/event?eid={}", id)),
        start: EventTime {
            date_time: Some(start.to_string()),
            ..Default::default()
        },
        end: EventTime {
            date_time: Some(end.to_string()),
            ..Default::default()
        },
        attendees: None,
    }
}

#[async_trait]
impl CalendarProvider for FakeCalendar {
    async fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    async fn list_events(
        &self,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, Error> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.list_fails {
            return Err(anyhow!("connection refused"));
        }
        // Same intersection rule as the Google API: end exclusive
        let overlapping = self
            .events
            .iter()
            .filter(|e| {
                let start = DateTime::parse_from_rfc3339(e.start.as_str());
                let end = DateTime::parse_from_rfc3339(e.end.as_str());
                match (start, end) {
                    (Ok(start), Ok(end)) => start < time_max && end > time_min,
                    _ => true,
                }
            })
            .cloned()
            .collect();
        Ok(overlapping)
    }

    async fn insert_event(&self, payload: &EventPayload) -> Result<CreatedEvent, Error> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        if self.insert_fails {
            return Err(anyhow!("Creating event failed with 403 Forbidden"));
        }
        self.inserted.lock().unwrap().push(payload.clone());
        Ok(CreatedEvent {
            id: String::from("evt_1"),
            link: EVENT_LINK.to_string(),
        })
    }
}

pub struct TestApp {
    pub router: Router,
    pub db: Connection,
    pub model: Arc<FakeModel>,
    pub calendar: Arc<FakeCalendar>,
    pub config: AppConfig,
    _dir: TempDir,
}

/// Creates a test application router backed by a temporary db, a free
/// calendar and a model that answers `BOOKING_REPLY`.
pub async fn test_app() -> TestApp {
    test_app_with(FakeModel::replying(BOOKING_REPLY), FakeCalendar::free(), |_| {}).await
}

pub async fn test_app_with(
    model: FakeModel,
    calendar: FakeCalendar,
    configure: impl FnOnce(&mut AppConfig),
) -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let storage_path = dir.path().to_str().unwrap().to_string();
    let mut config = AppConfig {
        db_path: format!("{}/db", storage_path),
        storage_path,
        google_client_id: String::from("test_client_id"),
        google_client_secret: String::from("test_client_secret"),
        openai_api_key: String::from("test-api-key"),
        ..AppConfig::default()
    };
    configure(&mut config);

    let db = initialized_db(&config.db_path)
        .await
        .expect("Failed to initialize db");

    let model = Arc::new(model);
    let calendar = Arc::new(calendar);
    let pipeline = Arc::new(BookingPipeline::new(
        model.clone(),
        calendar.clone(),
        config.pipeline_config(),
    ));
    let auth = google_auth(db.clone(), &config);
    let app_state = AppState::new(db.clone(), config.clone(), pipeline, calendar.clone(), auth);

    TestApp {
        router: app(Arc::new(RwLock::new(app_state))),
        db,
        model,
        calendar,
        config,
        _dir: dir,
    }
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not utf-8")
}
