//! Router for the chat session API

use std::sync::{Arc, RwLock};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_extra::extract::Query;

use super::public;
use crate::api::state::AppState;
use crate::chat::{chat_session_count, chat_session_list, find_chat_session_by_id};

type SharedState = Arc<RwLock<AppState>>;

const MAX_PAGE_SIZE: usize = 100;

/// Get a single chat session by ID
async fn chat_session(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, crate::api::public::ApiError> {
    let db = state.read().expect("Unable to read share state").db.clone();
    let transcript = find_chat_session_by_id(&db, &id).await?;

    if transcript.is_empty() {
        return Ok((
            StatusCode::NOT_FOUND,
            format!("Chat session {} not found", id),
        )
            .into_response());
    }

    Ok(Json(public::ChatTranscriptResponse { transcript }).into_response())
}

/// Get a page of chat sessions, newest first
async fn chat_list(
    State(state): State<SharedState>,
    Query(params): Query<public::ChatSessionsQuery>,
) -> Result<Json<public::ChatSessionsResponse>, crate::api::public::ApiError> {
    let db = state.read().expect("Unable to read share state").db.clone();
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(20).clamp(1, MAX_PAGE_SIZE);
    // SQLite offsets are signed 64 bit
    let offset = (page - 1).saturating_mul(limit).min(i64::MAX as usize);
    let total_sessions = chat_session_count(&db).await?;
    let sessions = chat_session_list(&db, limit, offset).await?;
    let total_pages = (total_sessions as f64 / limit as f64).ceil() as i64;

    Ok(Json(public::ChatSessionsResponse {
        sessions,
        page,
        limit,
        total_sessions,
        total_pages,
    }))
}

async fn selected_get(State(state): State<SharedState>) -> Json<public::SelectedSession> {
    let session_id = state
        .read()
        .expect("Unable to read share state")
        .selected_session
        .clone();
    Json(public::SelectedSession { session_id })
}

async fn selected_set(
    State(state): State<SharedState>,
    Json(data): Json<public::SelectedSession>,
) -> Json<public::SelectedSession> {
    state
        .write()
        .expect("Unable to write share state")
        .selected_session = data.session_id.clone();
    Json(data)
}

/// Create the chat router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/sessions", get(chat_list))
        .route("/selected", get(selected_get).post(selected_set))
        .route("/{id}", get(chat_session))
}
