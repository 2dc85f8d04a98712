//! Shuttle tracker update cycle.
//!
//! Periodically pulls the iTRAK data feed, stores a location for every new
//! vehicle observation and guesses which route each vehicle is on.

pub mod config;
pub mod error;
pub mod feed;
pub mod key_locker;
pub mod last_response;
pub mod provider;
pub mod route_guess;
pub mod updater;

pub use crate::config::Config;
pub use crate::error::*;
pub use crate::feed::DataFeedResponse;
pub use crate::key_locker::KeyLocker;
pub use crate::last_response::LastResponseCache;
pub use crate::provider::*;
pub use crate::updater::{CycleReport, Updater};
