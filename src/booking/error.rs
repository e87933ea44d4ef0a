use thiserror::Error;

/// Why free text couldn't be turned into a bookable slot
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Language model request failed: {0:#}")]
    ModelOrNetworkFailure(anyhow::Error),
    #[error("No JSON found")]
    NoJsonFound,
    #[error("Model returned invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Could not parse {field} as a date-time: {value:?}")]
    MalformedTimestamp { field: &'static str, value: String },
    #[error("end_time {end} is not after start_time {start}")]
    InvalidTimeRange { start: String, end: String },
    #[error("Failed to render prompt: {0}")]
    Prompt(#[from] handlebars::RenderError),
}

/// Raised only when the provider can't be queried. Whether it reaches
/// the caller depends on `ProviderUnavailablePolicy`.
#[derive(Debug, Error)]
pub enum AvailabilityError {
    #[error("Calendar provider unavailable: {0}")]
    ProviderUnavailable(String),
}

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Calendar service not available")]
    ServiceUnavailable,
    #[error("Calendar provider rejected the event: {0:#}")]
    ProviderRejected(anyhow::Error),
}
