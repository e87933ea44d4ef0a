//! Booking conversations: the session log and the replies shown to users

pub mod db;
pub mod reply;

pub use db::*;
