use std::sync::{Arc, LazyLock};

use chrono::NaiveDate;
use regex::Regex;
use serde_json::json;

use super::{BookingRequest, ExtractionError};
use crate::ai::LanguageModel;
use crate::ai::prompt::{Prompt, templates};
use crate::openai::{Message, Role};

// Non-greedy: only the first `{...}` span is considered and nested
// objects are cut at the first closing brace.
static JSON_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*?\}").expect("Invalid JSON object regex"));

/// First brace delimited span in `text`, if any. Best effort: prose
/// and markdown fences around the object are skipped.
pub fn first_json_object(text: &str) -> Option<&str> {
    JSON_OBJECT.find(text).map(|m| m.as_str())
}

/// Date given to the model to resolve relative dates like "next Friday"
pub fn reference_date(date: NaiveDate) -> String {
    date.format("%A, %Y-%m-%d").to_string()
}

/// Turns free text into a `BookingRequest` with a language model
#[derive(Clone)]
pub struct Extractor {
    model: Arc<dyn LanguageModel>,
}

impl Extractor {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    pub async fn extract(
        &self,
        user_text: &str,
        reference_date: &str,
    ) -> Result<BookingRequest, ExtractionError> {
        let instruction = templates().render(
            &Prompt::ExtractBooking.to_string(),
            &json!({ "today": reference_date }),
        )?;
        let messages = vec![
            Message::new(Role::System, &instruction),
            Message::new(Role::User, user_text),
        ];

        let output = self
            .model
            .complete(&messages)
            .await
            .map_err(ExtractionError::ModelOrNetworkFailure)?;

        let span = first_json_object(&output).ok_or_else(|| {
            tracing::warn!("No JSON object in model output: {}", output);
            ExtractionError::NoJsonFound
        })?;

        let request: BookingRequest = serde_json::from_str(span)?;
        tracing::debug!("Extracted booking request: {:?}", request);

        Ok(request)
    }
}
