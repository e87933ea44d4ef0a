//! Router for the booking API

use std::sync::{Arc, RwLock};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use axum_extra::extract::Query;

use super::public;
use crate::api::state::AppState;
use crate::booking::Outcome;
use crate::booking::db::{DemoBooking, demo_booking_list, record_demo_outcome};
use crate::chat::reply;
use crate::chat::{get_or_create_session, insert_chat_message};
use crate::openai::{Message, Role};

type SharedState = Arc<RwLock<AppState>>;

fn status_code(outcome: &Outcome) -> StatusCode {
    match outcome {
        Outcome::Confirmed(_) | Outcome::Conflict { .. } => StatusCode::OK,
        Outcome::Rejected { .. } => StatusCode::BAD_REQUEST,
        Outcome::Failed { .. } => StatusCode::BAD_GATEWAY,
    }
}

/// Render the reply, keep demo bookings, append the exchange to the
/// session if there is one, and build the response.
async fn respond(
    state: &SharedState,
    outcome: Outcome,
    user_message: &str,
    description: &str,
    session_id: Option<String>,
    user: Option<&str>,
) -> Result<(StatusCode, Json<public::BookingResponse>), crate::api::public::ApiError> {
    let message = reply::render(&outcome)?;
    let db = state.read().expect("Unable to read share state").db.clone();

    record_demo_outcome(&db, &outcome, description).await?;

    if let Some(session_id) = &session_id {
        get_or_create_session(&db, session_id, user).await?;
        insert_chat_message(&db, session_id, &Message::new(Role::User, user_message)).await?;
        insert_chat_message(&db, session_id, &Message::new(Role::Assistant, &message)).await?;
    }

    let resp = public::BookingResponse::new(&outcome, message, session_id);
    Ok((status_code(&outcome), Json(resp)))
}

/// Run a free text booking request through the pipeline
async fn book_handler(
    State(state): State<SharedState>,
    Json(payload): Json<public::BookRequest>,
) -> Result<(StatusCode, Json<public::BookingResponse>), crate::api::public::ApiError> {
    let pipeline = state
        .read()
        .expect("Unable to read share state")
        .pipeline
        .clone();

    let outcome = pipeline.handle_request(&payload.message).await;
    tracing::info!("Booking request finished with {}", outcome.status());

    respond(
        &state,
        outcome,
        &payload.message,
        &payload.message,
        payload.session_id,
        payload.user.as_deref(),
    )
    .await
}

/// Book a specific start time, skipping extraction
async fn book_slot_handler(
    State(state): State<SharedState>,
    Json(payload): Json<public::BookSlotRequest>,
) -> Result<(StatusCode, Json<public::BookingResponse>), crate::api::public::ApiError> {
    let pipeline = state
        .read()
        .expect("Unable to read share state")
        .pipeline
        .clone();

    let outcome = pipeline
        .attempt_slot(&payload.start_time, &payload.description, &payload.invitees)
        .await;
    tracing::info!("Slot request finished with {}", outcome.status());

    let user_message = format!("Book the slot at {}", payload.start_time);
    respond(
        &state,
        outcome,
        &user_message,
        &payload.description,
        payload.session_id,
        None,
    )
    .await
}

/// List bookings that were only recorded locally, newest first
async fn demo_list_handler(
    State(state): State<SharedState>,
    Query(params): Query<public::DemoBookingsQuery>,
) -> Result<Json<Vec<DemoBooking>>, crate::api::public::ApiError> {
    let db = state.read().expect("Unable to read share state").db.clone();
    let limit = params.limit.unwrap_or(20).clamp(1, 100);
    let bookings = demo_booking_list(&db, limit).await?;
    Ok(Json(bookings))
}

/// Create the booking router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", post(book_handler))
        .route("/slot", post(book_slot_handler))
        .route("/demo", get(demo_list_handler))
}
