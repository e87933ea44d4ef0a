//! Router for connecting the Google calendar

use std::sync::{Arc, RwLock};

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
};
use axum_extra::extract::Query;

use super::public;
use crate::api::state::AppState;
use crate::google::oauth::authorization_url;

type SharedState = Arc<RwLock<AppState>>;

async fn auth_url(State(state): State<SharedState>) -> Json<public::AuthUrlResponse> {
    let auth = state.read().expect("Unable to read share state").auth.clone();
    Json(public::AuthUrlResponse {
        url: authorization_url(auth.oauth()),
    })
}

/// Exchange the authorization code from the consent redirect and save
/// the token
async fn auth_callback(
    State(state): State<SharedState>,
    Query(params): Query<public::CallbackQuery>,
) -> Result<impl IntoResponse, crate::api::public::ApiError> {
    let (auth, account) = {
        let shared_state = state.read().expect("Unable to read share state");
        (
            shared_state.auth.clone(),
            shared_state.config.calendar_account.clone(),
        )
    };

    let Some(code) = params.code.filter(|c| !c.trim().is_empty()) else {
        let reason = params.error.unwrap_or_else(|| String::from("Missing code"));
        return Ok((StatusCode::BAD_REQUEST, reason).into_response());
    };

    auth.authorize(code.trim()).await?;

    Ok(Json(public::CallbackResponse {
        account,
        status: String::from("connected"),
    })
    .into_response())
}

/// Create the auth router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/url", get(auth_url))
        .route("/callback", get(auth_callback))
}
