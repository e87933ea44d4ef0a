use std::sync::Arc;

use super::{BookingError, BookingResult, TimeSlot};
use crate::calendar::{CalendarProvider, EventPayload, clean_invitees};

/// Creates calendar events. Makes exactly one insert attempt per call.
#[derive(Clone)]
pub struct BookingService {
    provider: Arc<dyn CalendarProvider>,
    summary: String,
}

impl BookingService {
    pub fn new(provider: Arc<dyn CalendarProvider>, summary: &str) -> Self {
        Self {
            provider,
            summary: summary.to_string(),
        }
    }

    pub async fn book(
        &self,
        slot: &TimeSlot,
        description: &str,
        invitees: &[String],
    ) -> Result<BookingResult, BookingError> {
        if !self.provider.is_authenticated().await {
            return Err(BookingError::ServiceUnavailable);
        }

        let payload = EventPayload::new(&self.summary, description, slot, invitees);
        let created = self
            .provider
            .insert_event(&payload)
            .await
            .map_err(BookingError::ProviderRejected)?;

        tracing::info!("Created event {} for {}", created.id, slot);

        Ok(BookingResult {
            link: created.link,
            start: slot.start,
            end: slot.end,
            invitees: clean_invitees(invitees),
            authoritative: true,
        })
    }
}
