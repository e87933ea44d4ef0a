use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::ExtractionError;

/// Every booking and every suggested alternate lasts this long,
/// whatever end time the model returned.
pub const SLOT_DURATION_MINUTES: i64 = 30;

/// Number of alternates offered on a conflict, one hour apart
pub const ALTERNATE_COUNT: usize = 3;

const LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse a model supplied timestamp. Values with an offset are
/// converted into `tz`, naive values are read as wall clock time in
/// `tz`. Local times that don't exist (DST gaps) fail to parse.
pub fn parse_timestamp(value: &str, tz: Tz) -> Option<DateTime<Tz>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&tz));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .and_then(|naive| tz.from_local_datetime(&naive).earliest())
}

/// Anything other than a string reads as missing
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

/// A list of strings where `null`, non-string items and a non-list
/// value are all dropped
fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        _ => return Ok(vec![]),
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect())
}

/// Structured request as extracted from the model's output. Only the
/// JSON shape is checked here, timestamps are validated when the
/// request is turned into a slot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BookingRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub start_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub end_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub invitees: Vec<String>,
}

impl BookingRequest {
    /// Derive the 30 minute slot to book. With `EndTimePolicy::Validate`
    /// the model's end time must also parse and come after the start,
    /// but it still doesn't change the slot length.
    pub fn slot(&self, tz: Tz, policy: EndTimePolicy) -> Result<TimeSlot, ExtractionError> {
        let start = parse_field("start_time", self.start_time.as_deref(), tz)?;

        if policy == EndTimePolicy::Validate {
            let end = parse_field("end_time", self.end_time.as_deref(), tz)?;
            if end <= start {
                return Err(ExtractionError::InvalidTimeRange {
                    start: start.format(LOCAL_FORMAT).to_string(),
                    end: end.format(LOCAL_FORMAT).to_string(),
                });
            }
        }

        Ok(TimeSlot::starting_at(start))
    }
}

fn parse_field(
    field: &'static str,
    value: Option<&str>,
    tz: Tz,
) -> Result<DateTime<Tz>, ExtractionError> {
    let value = value.unwrap_or_default();
    parse_timestamp(value, tz).ok_or_else(|| ExtractionError::MalformedTimestamp {
        field,
        value: value.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSlot {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl TimeSlot {
    pub fn starting_at(start: DateTime<Tz>) -> Self {
        Self {
            start,
            end: start + Duration::minutes(SLOT_DURATION_MINUTES),
        }
    }

    pub fn timezone(&self) -> Tz {
        self.start.timezone()
    }

    /// Wall clock start in the slot's zone, e.g. `2024-06-11T15:00:00`
    pub fn start_local(&self) -> String {
        self.start.format(LOCAL_FORMAT).to_string()
    }

    pub fn end_local(&self) -> String {
        self.end.format(LOCAL_FORMAT).to_string()
    }

    pub fn utc_bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.start.with_timezone(&Utc), self.end.with_timezone(&Utc))
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} to {} ({})",
            self.start_local(),
            self.end_local(),
            self.timezone().name()
        )
    }
}

/// Suggestions offered when the requested slot is taken. They are not
/// checked and must each be resubmitted as a new attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct AlternateSlotSet([TimeSlot; ALTERNATE_COUNT]);

impl AlternateSlotSet {
    pub fn after(busy: &TimeSlot) -> Self {
        let shifted = |hours: i64| TimeSlot::starting_at(busy.start + Duration::hours(hours));
        Self([shifted(1), shifted(2), shifted(3)])
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.0
    }

    pub fn get(&self, idx: usize) -> Option<&TimeSlot> {
        self.0.get(idx)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookingResult {
    /// Provider issued link, surfaced as is
    pub link: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub invitees: Vec<String>,
    /// False when the link was made up locally and nothing was written
    /// to the calendar
    pub authoritative: bool,
}

/// Terminal state of one pass through the pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Confirmed(BookingResult),
    Conflict {
        requested: TimeSlot,
        alternates: AlternateSlotSet,
        invitees: Vec<String>,
    },
    Rejected {
        reason: String,
    },
    Failed {
        reason: String,
    },
}

impl Outcome {
    pub fn status(&self) -> &'static str {
        match self {
            Outcome::Confirmed(_) => "confirmed",
            Outcome::Conflict { .. } => "conflict",
            Outcome::Rejected { .. } => "rejected",
            Outcome::Failed { .. } => "failed",
        }
    }
}

/// What the availability check answers when the provider can't be
/// queried (unreachable or unauthenticated).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderUnavailablePolicy {
    /// Treat the slot as free. A slot may get double booked while the
    /// provider is down.
    #[default]
    AssumeFree,
    AssumeBusy,
    Fail,
}

impl FromStr for ProviderUnavailablePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "assume_free" => Ok(Self::AssumeFree),
            "assume_busy" => Ok(Self::AssumeBusy),
            "fail" => Ok(Self::Fail),
            other => Err(format!("Unknown provider unavailable policy: {}", other)),
        }
    }
}

/// How the model's `end_time` is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndTimePolicy {
    /// Only `start_time` has to parse
    #[default]
    Ignore,
    /// `end_time` must parse and be after `start_time`
    Validate,
}

impl FromStr for EndTimePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "validate" => Ok(Self::Validate),
            other => Err(format!("Unknown end time policy: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Organizational zone used for parsing and for created events
    pub timezone: Tz,
    pub event_summary: String,
    pub on_provider_unavailable: ProviderUnavailablePolicy,
    pub end_time_policy: EndTimePolicy,
    /// Answer with a non-authoritative "add to calendar" link when the
    /// calendar service isn't available
    pub demo_fallback: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::Asia::Kolkata,
            event_summary: String::from("Slotbot Meeting"),
            on_provider_unavailable: ProviderUnavailablePolicy::default(),
            end_time_policy: EndTimePolicy::default(),
            demo_fallback: false,
        }
    }
}
