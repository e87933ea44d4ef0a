//! API routes module

pub mod auth;
pub mod booking;
pub mod calendar;
pub mod chat;

use std::sync::{Arc, RwLock};

use crate::api::state::AppState;
use axum::Router;

type SharedState = Arc<RwLock<AppState>>;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Booking routes
        .nest("/book", booking::router())
        // Chat session routes
        .nest("/chat", chat::router())
        // Calendar routes
        .nest("/calendar", calendar::router())
        // Calendar authorization routes
        .nest("/auth", auth::router())
}
