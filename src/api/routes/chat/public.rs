//! Public types for the chat API
use serde::{Deserialize, Serialize};

use crate::chat::ChatSession;
use crate::openai::Message;

#[derive(Deserialize)]
pub struct ChatSessionsQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct ChatSessionsResponse {
    pub sessions: Vec<ChatSession>,
    pub page: usize,
    pub limit: usize,
    pub total_sessions: i64,
    pub total_pages: i64,
}

#[derive(Serialize)]
pub struct ChatTranscriptResponse {
    pub transcript: Vec<Message>,
}

#[derive(Serialize, Deserialize)]
pub struct SelectedSession {
    pub session_id: Option<String>,
}
