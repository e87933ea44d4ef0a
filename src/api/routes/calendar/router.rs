//! Router for the calendar API

use std::sync::{Arc, RwLock};

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use axum_extra::extract::Query;
use chrono::TimeDelta;

use super::public;
use crate::api::state::AppState;

type SharedState = Arc<RwLock<AppState>>;

/// Upcoming events on the booking calendar
async fn calendar_handler(
    State(state): State<SharedState>,
    Query(params): Query<public::CalendarQuery>,
) -> Result<impl IntoResponse, crate::api::public::ApiError> {
    let calendar = state
        .read()
        .expect("Unable to read share state")
        .calendar
        .clone();

    // Default to 7 days ahead if not specified
    let days_ahead = params.days_ahead.unwrap_or(7).max(0);
    let now = chrono::Utc::now();
    let Some(end_time) = TimeDelta::try_days(days_ahead).and_then(|d| now.checked_add_signed(d))
    else {
        return Ok((
            StatusCode::BAD_REQUEST,
            format!("days_ahead {} is out of range", days_ahead),
        )
            .into_response());
    };

    if !calendar.is_authenticated().await {
        return Ok((StatusCode::UNAUTHORIZED, "Calendar is not connected").into_response());
    }

    let events = calendar.list_events(now, end_time).await?;

    let resp: Vec<public::CalendarResponse> = events
        .into_iter()
        .map(|event| public::CalendarResponse {
            start: event.start.as_str().to_string(),
            end: event.end.as_str().to_string(),
            id: event.id,
            summary: event.summary.unwrap_or_else(|| "No title".to_string()),
            link: event.html_link,
            attendees: event.attendees.map(|attendees| {
                attendees
                    .into_iter()
                    .map(|attendee| public::CalendarAttendee {
                        email: attendee.email,
                        display_name: attendee.display_name,
                    })
                    .collect::<Vec<_>>()
            }),
        })
        .collect();

    Ok(Json(resp).into_response())
}

/// Create the calendar router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", axum::routing::get(calendar_handler))
}
