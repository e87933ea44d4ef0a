//! Public types for the booking API
use serde::{Deserialize, Serialize};

use crate::booking::{Outcome, TimeSlot};

#[derive(Deserialize)]
pub struct BookRequest {
    pub message: String,
    pub session_id: Option<String>,
    /// Used to title a new session
    pub user: Option<String>,
}

/// Resubmit a specific slot, usually an alternate from a conflict
#[derive(Deserialize)]
pub struct BookSlotRequest {
    pub start_time: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub invitees: Vec<String>,
    pub session_id: Option<String>,
}

#[derive(Deserialize)]
pub struct DemoBookingsQuery {
    pub limit: Option<usize>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SlotResponse {
    pub start_time: String,
    pub end_time: String,
}

impl From<&TimeSlot> for SlotResponse {
    fn from(slot: &TimeSlot) -> Self {
        Self {
            start_time: slot.start.to_rfc3339(),
            end_time: slot.end.to_rfc3339(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct BookingResponse {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authoritative: Option<bool>,
    #[serde(default)]
    pub invitees: Vec<String>,
    #[serde(default)]
    pub alternates: Vec<SlotResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl BookingResponse {
    pub fn new(outcome: &Outcome, message: String, session_id: Option<String>) -> Self {
        let mut resp = Self {
            status: outcome.status().to_string(),
            message,
            start_time: None,
            end_time: None,
            calendar_link: None,
            authoritative: None,
            invitees: vec![],
            alternates: vec![],
            session_id,
        };

        match outcome {
            Outcome::Confirmed(result) => {
                resp.start_time = Some(result.start.to_rfc3339());
                resp.end_time = Some(result.end.to_rfc3339());
                resp.calendar_link = Some(result.link.clone());
                resp.authoritative = Some(result.authoritative);
                resp.invitees = result.invitees.clone();
            }
            Outcome::Conflict {
                requested,
                alternates,
                invitees,
            } => {
                resp.start_time = Some(requested.start.to_rfc3339());
                resp.end_time = Some(requested.end.to_rfc3339());
                resp.invitees = invitees.clone();
                resp.alternates = alternates.slots().iter().map(SlotResponse::from).collect();
            }
            Outcome::Rejected { .. } | Outcome::Failed { .. } => {}
        }

        resp
    }
}
