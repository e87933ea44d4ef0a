//! Chat replies rendered from pipeline outcomes

use anyhow::{Error, Result};
use handlebars::Handlebars;
use serde_json::json;

use crate::booking::{Outcome, TimeSlot};

const CONFIRMED: &str = "Meeting booked from {{start}} to {{end}}.
{{#if invitees}}Invitees: {{invitees}}
{{/if}}{{#if authoritative}}View on Google Calendar: {{link}}{{else}}Calendar is not connected so nothing was added to your calendar. Add it yourself: {{link}}{{/if}}";

const CONFLICT: &str = "That time slot ({{requested}}) is already booked. Suggested options:
{{#each alternates}}{{n}}. {{label}}
{{/each}}Reply with a number to book one.";

const REJECTED: &str = "Sorry, I couldn't work out when to book that: {{reason}}";

const FAILED: &str = "Sorry, the meeting couldn't be booked: {{reason}}";

const START_FORMAT: &str = "%A, %d %B %Y %I:%M %p";
const END_FORMAT: &str = "%I:%M %p";
const ALTERNATE_FORMAT: &str = "%A %I:%M %p";

fn templates<'a>() -> Result<Handlebars<'a>, Error> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry.register_escape_fn(handlebars::no_escape);
    registry.register_template_string("confirmed", CONFIRMED)?;
    registry.register_template_string("conflict", CONFLICT)?;
    registry.register_template_string("rejected", REJECTED)?;
    registry.register_template_string("failed", FAILED)?;
    Ok(registry)
}

fn alternate_label(slot: &TimeSlot) -> String {
    slot.start.format(ALTERNATE_FORMAT).to_string()
}

/// Human readable reply for `outcome`
pub fn render(outcome: &Outcome) -> Result<String, Error> {
    let registry = templates()?;
    let reply = match outcome {
        Outcome::Confirmed(result) => registry.render(
            "confirmed",
            &json!({
                "start": result.start.format(START_FORMAT).to_string(),
                "end": result.end.format(END_FORMAT).to_string(),
                "invitees": result.invitees.join(", "),
                "link": result.link,
                "authoritative": result.authoritative,
            }),
        )?,
        Outcome::Conflict {
            requested,
            alternates,
            ..
        } => {
            let labels: Vec<String> = alternates.slots().iter().map(alternate_label).collect();
            let numbered: Vec<serde_json::Value> = labels
                .iter()
                .enumerate()
                .map(|(idx, label)| json!({"n": idx + 1, "label": label}))
                .collect();
            registry.render(
                "conflict",
                &json!({
                    "requested": requested.start.format(START_FORMAT).to_string(),
                    "alternates": numbered,
                }),
            )?
        }
        Outcome::Rejected { reason } => registry.render("rejected", &json!({"reason": reason}))?,
        Outcome::Failed { reason } => registry.render("failed", &json!({"reason": reason}))?,
    };
    Ok(reply)
}
