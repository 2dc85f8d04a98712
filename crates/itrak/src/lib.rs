//! # iTRAK Feed
//!
//! Parses the iTRAK vehicle data feed into typed records.

mod error;
mod feed;
mod record;

pub mod itrak_date;

pub use self::error::Error;
pub use self::feed::*;
pub use self::record::*;

/// Result type for parsing.
pub type Result<T> = anyhow::Result<T, Error>;
