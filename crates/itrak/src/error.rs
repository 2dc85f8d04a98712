//! # iTRAK Errors

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a feed record could not be parsed.
#[derive(Error, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Error {
    #[error("code: invalid_format, description: {0}")]
    InvalidFormat(String),

    #[error("code: invalid_timestamp, description: {0}")]
    InvalidTimestamp(String),

    #[error("code: invalid_number, description: {0}")]
    InvalidNumber(String),
}

impl Error {
    /// Returns the error code.
    #[must_use]
    pub const fn code(&self) -> &str {
        match self {
            Self::InvalidFormat(_) => "invalid_format",
            Self::InvalidTimestamp(_) => "invalid_timestamp",
            Self::InvalidNumber(_) => "invalid_number",
        }
    }

    /// Returns the error description.
    #[must_use]
    pub fn description(&self) -> String {
        self.to_string()
    }
}
