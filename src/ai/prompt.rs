//! Reusable prompts using Handlebars for templating. Strict mode is on
//! so a missing variable is an error rather than an empty string.

use std::fmt;

use handlebars::Handlebars;

#[derive(Debug)]
pub enum Prompt {
    ExtractBooking,
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl From<Prompt> for String {
    fn from(item: Prompt) -> String {
        format!("{:?}", item)
    }
}

const EXTRACT_BOOKING_PROMPT: &str = r#"You are a calendar agent. Extract structured info from user input.

Return JSON like:
{
  "start_time": "YYYY-MM-DDTHH:MM:SS",
  "end_time": "YYYY-MM-DDTHH:MM:SS",
  "invitees": ["email1@example.com", "email2@example.com"]
}

Meeting is 30 minutes. Today is {{today}}."#;

pub fn templates<'a>() -> Handlebars<'a> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    // Prompts are plain text, not HTML
    registry.register_escape_fn(handlebars::no_escape);
    registry
        .register_template_string(&Prompt::ExtractBooking.to_string(), EXTRACT_BOOKING_PROMPT)
        .expect("Failed to register template");
    registry
}
