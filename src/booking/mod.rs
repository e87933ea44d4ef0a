//! Request interpretation, availability check and booking decision.
//!
//! Each request makes a single pass: extract a request from free text,
//! normalize it to a 30 minute slot, check the calendar, then either
//! book or offer alternates. Nothing is retried automatically.
//!
//! Known limitation: nothing locks the calendar between the
//! availability check and the insert, so two concurrent requests can
//! both book the same slot.

pub mod availability;
pub mod db;
pub mod demo;
mod error;
pub mod extractor;
mod models;
pub mod pipeline;
pub mod service;
#[cfg(test)]
mod testing;

pub use availability::AvailabilityChecker;
pub use error::{AvailabilityError, BookingError, ExtractionError};
pub use extractor::Extractor;
pub use models::*;
pub use pipeline::BookingPipeline;
pub use service::BookingService;
