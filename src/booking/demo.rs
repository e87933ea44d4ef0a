//! Local "add to calendar" links for when no calendar session exists.
//! Nothing is written to any calendar.

use super::{BookingResult, TimeSlot};
use crate::calendar::clean_invitees;

const TEMPLATE_URL: &str = "https://calendar.google.com/calendar/render";
const COMPACT_FORMAT: &str = "%Y%m%dT%H%M%S";

pub fn template_link(summary: &str, description: &str, slot: &TimeSlot, invitees: &[String]) -> String {
    let mut link = format!(
        "{}?action=TEMPLATE&text={}&dates={}/{}&details={}&ctz={}",
        TEMPLATE_URL,
        urlencoding::encode(summary),
        slot.start.format(COMPACT_FORMAT),
        slot.end.format(COMPACT_FORMAT),
        urlencoding::encode(description),
        urlencoding::encode(slot.timezone().name()),
    );
    let guests = clean_invitees(invitees);
    if !guests.is_empty() {
        link.push_str("&add=");
        link.push_str(&urlencoding::encode(&guests.join(",")));
    }
    link
}

/// A non-authoritative result pointing at a prefilled event form
pub fn placeholder_booking(
    summary: &str,
    description: &str,
    slot: &TimeSlot,
    invitees: &[String],
) -> BookingResult {
    BookingResult {
        link: template_link(summary, description, slot, invitees),
        start: slot.start,
        end: slot.end,
        invitees: clean_invitees(invitees),
        authoritative: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::parse_timestamp;

    #[test]
    fn test_placeholder_booking() {
        let slot = TimeSlot::starting_at(
            parse_timestamp("2024-06-11T15:00:00", chrono_tz::Asia::Kolkata).unwrap(),
        );
        let result = placeholder_booking(
            "Slotbot Meeting",
            "Coffee chat",
            &slot,
            &["a@x.com".to_string(), "b@y.org".to_string()],
        );

        assert!(!result.authoritative);
        assert_eq!(
            result.link,
            "https://calendar.google.com/calendar/render?action=TEMPLATE&text=Slotbot%20Meeting&dates=20240611T150000/20240611T153000&details=Coffee%20chat&ctz=Asia%2FKolkata&add=a%40x.com%2Cb%40y.org"
        );
    }
}
