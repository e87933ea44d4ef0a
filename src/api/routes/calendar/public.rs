//! Public types for the calendar API
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct CalendarQuery {
    pub days_ahead: Option<i64>,
}

#[derive(Serialize, Deserialize)]
pub struct CalendarAttendee {
    pub email: String,
    pub display_name: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct CalendarResponse {
    pub id: String,
    pub summary: String,
    // Passed through as the provider sent them, all day events are dates
    pub start: String,
    pub end: String,
    pub link: Option<String>,
    pub attendees: Option<Vec<CalendarAttendee>>,
}
