//! Public types for the calendar authorization API
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct AuthUrlResponse {
    pub url: String,
}

#[derive(Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct CallbackResponse {
    pub account: String,
    pub status: String,
}
