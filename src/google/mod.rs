pub mod auth;
pub mod gcal;
pub mod oauth;
pub mod token_store;

pub use auth::GoogleAuth;
pub use gcal::GoogleCalendar;
