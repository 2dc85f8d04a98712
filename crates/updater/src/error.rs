use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a cycle, or a single record within it, was not processed.
///
/// Each variant is contained at the smallest unit it affects: `Transport` and
/// `BadStatus` skip the cycle, the rest skip one record.
#[derive(Error, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Error {
    #[error("code: transport_failure, description: {0}")]
    Transport(String),

    #[error("code: bad_status, description: data feed status code {0}")]
    BadStatus(u16),

    #[error("code: parse_failure, description: {0}")]
    Parse(String),

    #[error("code: unknown_vehicle, description: unknown vehicle ID \"{0}\" returned by iTRAK")]
    UnknownVehicle(String),

    #[error("code: duplicate_observation")]
    Duplicate,

    #[error("code: storage_failure, description: {0}")]
    Storage(String),

    #[error("code: retention_failure, description: {0}")]
    Retention(String),
}

impl Error {
    /// Returns the error code.
    #[must_use]
    pub const fn code(&self) -> &str {
        match self {
            Self::Transport(_) => "transport_failure",
            Self::BadStatus(_) => "bad_status",
            Self::Parse(_) => "parse_failure",
            Self::UnknownVehicle(_) => "unknown_vehicle",
            Self::Duplicate => "duplicate_observation",
            Self::Storage(_) => "storage_failure",
            Self::Retention(_) => "retention_failure",
        }
    }

    /// Returns the error description.
    #[must_use]
    pub fn description(&self) -> String {
        self.to_string()
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<Self>() {
            Some(Self::Transport(e)) => Self::Transport(format!("{err}: {e}")),
            Some(Self::BadStatus(status)) => Self::BadStatus(*status),
            Some(Self::Parse(e)) => Self::Parse(format!("{err}: {e}")),
            Some(Self::UnknownVehicle(id)) => Self::UnknownVehicle(id.clone()),
            Some(Self::Duplicate) => Self::Duplicate,
            Some(Self::Storage(e)) => Self::Storage(format!("{err}: {e}")),
            Some(Self::Retention(e)) => Self::Retention(format!("{err}: {e}")),
            // collaborators report failures as plain anyhow errors
            None => {
                let stack = err.chain().fold(String::new(), |cause, e| format!("{cause} -> {e}"));
                let stack = stack.trim_start_matches(" -> ").to_string();
                Self::Storage(stack)
            }
        }
    }
}

impl From<itrak::Error> for Error {
    fn from(err: itrak::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
