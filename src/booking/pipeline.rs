use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

use super::extractor::reference_date;
use super::{
    AlternateSlotSet, AvailabilityChecker, BookingError, BookingService, Extractor, Outcome,
    PipelineConfig, TimeSlot, demo, parse_timestamp,
};
use crate::ai::LanguageModel;
use crate::calendar::{CalendarProvider, clean_invitees};

/// Extract, check, then book. Holds no mutable state so it can be
/// shared across requests behind an `Arc`.
pub struct BookingPipeline {
    extractor: Extractor,
    availability: AvailabilityChecker,
    booking: BookingService,
    config: PipelineConfig,
}

impl BookingPipeline {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        provider: Arc<dyn CalendarProvider>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            extractor: Extractor::new(model),
            availability: AvailabilityChecker::new(
                provider.clone(),
                config.on_provider_unavailable,
            ),
            booking: BookingService::new(provider, &config.event_summary),
            config,
        }
    }

    pub fn timezone(&self) -> Tz {
        self.config.timezone
    }

    /// Run a free text request through the pipeline using today's date
    /// in the organizational zone to resolve relative dates.
    pub async fn handle_request(&self, user_text: &str) -> Outcome {
        let today = Utc::now().with_timezone(&self.config.timezone).date_naive();
        self.handle_request_on(user_text, today).await
    }

    pub async fn handle_request_on(&self, user_text: &str, today: NaiveDate) -> Outcome {
        let request = match self
            .extractor
            .extract(user_text, &reference_date(today))
            .await
        {
            Ok(request) => request,
            Err(err) => {
                tracing::info!("Rejected request {:?}: {}", user_text, err);
                return Outcome::Rejected {
                    reason: err.to_string(),
                };
            }
        };

        let slot = match request.slot(self.config.timezone, self.config.end_time_policy) {
            Ok(slot) => slot,
            Err(err) => {
                tracing::info!("Rejected request {:?}: {}", request, err);
                return Outcome::Rejected {
                    reason: err.to_string(),
                };
            }
        };

        self.attempt(&slot, user_text, &request.invitees).await
    }

    /// Resubmit a specific start time, typically one of the alternates
    /// from an earlier conflict. Goes straight to the availability check.
    pub async fn attempt_slot(
        &self,
        start_time: &str,
        description: &str,
        invitees: &[String],
    ) -> Outcome {
        match parse_timestamp(start_time, self.config.timezone) {
            Some(start) => {
                self.attempt(&TimeSlot::starting_at(start), description, invitees)
                    .await
            }
            None => Outcome::Rejected {
                reason: format!("Could not parse start_time as a date-time: {:?}", start_time),
            },
        }
    }

    async fn attempt(&self, slot: &TimeSlot, description: &str, invitees: &[String]) -> Outcome {
        match self.availability.is_free(slot).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::info!("Slot {} is busy, offering alternates", slot);
                return Outcome::Conflict {
                    requested: slot.clone(),
                    alternates: AlternateSlotSet::after(slot),
                    invitees: clean_invitees(invitees),
                };
            }
            Err(err) => {
                return Outcome::Failed {
                    reason: err.to_string(),
                };
            }
        }

        match self.booking.book(slot, description, invitees).await {
            Ok(result) => Outcome::Confirmed(result),
            Err(BookingError::ServiceUnavailable) if self.config.demo_fallback => {
                tracing::warn!("No calendar session, answering {} with a template link", slot);
                Outcome::Confirmed(demo::placeholder_booking(
                    &self.config.event_summary,
                    description,
                    slot,
                    invitees,
                ))
            }
            Err(err) => {
                tracing::error!("Booking {} failed: {}", slot, err);
                Outcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }
}
