use std::sync::Arc;

use super::{AvailabilityError, ProviderUnavailablePolicy, TimeSlot};
use crate::calendar::CalendarProvider;

/// Answers whether a slot is free on the calendar. Read only, calling
/// it any number of times has no side effects on the calendar.
#[derive(Clone)]
pub struct AvailabilityChecker {
    provider: Arc<dyn CalendarProvider>,
    policy: ProviderUnavailablePolicy,
}

impl AvailabilityChecker {
    pub fn new(provider: Arc<dyn CalendarProvider>, policy: ProviderUnavailablePolicy) -> Self {
        Self { provider, policy }
    }

    /// True when no event intersects `slot`. If the provider can't be
    /// queried the configured policy decides the answer.
    pub async fn is_free(&self, slot: &TimeSlot) -> Result<bool, AvailabilityError> {
        match self.query(slot).await {
            Ok(free) => Ok(free),
            Err(err) => {
                tracing::warn!("Availability check for {} failed: {}", slot, err);
                match self.policy {
                    ProviderUnavailablePolicy::AssumeFree => Ok(true),
                    ProviderUnavailablePolicy::AssumeBusy => Ok(false),
                    ProviderUnavailablePolicy::Fail => Err(err),
                }
            }
        }
    }

    async fn query(&self, slot: &TimeSlot) -> Result<bool, AvailabilityError> {
        if !self.provider.is_authenticated().await {
            return Err(AvailabilityError::ProviderUnavailable(String::from(
                "not authenticated",
            )));
        }

        let (time_min, time_max) = slot.utc_bounds();
        let events = self
            .provider
            .list_events(time_min, time_max)
            .await
            .map_err(|e| AvailabilityError::ProviderUnavailable(format!("{:#}", e)))?;

        tracing::debug!("Found {} events intersecting {}", events.len(), slot);
        Ok(events.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::parse_timestamp;
    use crate::booking::testing::FakeCalendar;

    fn slot() -> TimeSlot {
        TimeSlot::starting_at(parse_timestamp("2024-06-11T15:00:00", chrono_tz::Asia::Kolkata).unwrap())
    }

    fn checker(calendar: FakeCalendar, policy: ProviderUnavailablePolicy) -> (Arc<FakeCalendar>, AvailabilityChecker) {
        let calendar = Arc::new(calendar);
        let checker = AvailabilityChecker::new(calendar.clone(), policy);
        (calendar, checker)
    }

    #[tokio::test]
    async fn test_free_and_busy() {
        let (_, free) = checker(FakeCalendar::free(), ProviderUnavailablePolicy::AssumeFree);
        assert!(free.is_free(&slot()).await.unwrap());

        let (_, busy) = checker(FakeCalendar::busy(), ProviderUnavailablePolicy::AssumeFree);
        assert!(!busy.is_free(&slot()).await.unwrap());
    }

    #[tokio::test]
    async fn test_is_free_is_idempotent() {
        let (calendar, checker) = checker(FakeCalendar::busy(), ProviderUnavailablePolicy::AssumeFree);
        let first = checker.is_free(&slot()).await.unwrap();
        let second = checker.is_free(&slot()).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(calendar.list_calls(), 2);
        assert_eq!(calendar.insert_calls(), 0);
    }

    #[tokio::test]
    async fn test_unreachable_provider_follows_policy() {
        let failing = || FakeCalendar {
            list_fails: true,
            ..FakeCalendar::free()
        };

        let (_, assume_free) = checker(failing(), ProviderUnavailablePolicy::AssumeFree);
        assert!(assume_free.is_free(&slot()).await.unwrap());

        let (_, assume_busy) = checker(failing(), ProviderUnavailablePolicy::AssumeBusy);
        assert!(!assume_busy.is_free(&slot()).await.unwrap());

        let (_, fail) = checker(failing(), ProviderUnavailablePolicy::Fail);
        let err = fail.is_free(&slot()).await.unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_unauthenticated_provider_is_unavailable() {
        let (calendar, checker) = checker(FakeCalendar::default(), ProviderUnavailablePolicy::Fail);
        let err = checker.is_free(&slot()).await.unwrap_err();
        assert!(matches!(err, AvailabilityError::ProviderUnavailable(_)));
        assert_eq!(calendar.list_calls(), 0);
    }
}
