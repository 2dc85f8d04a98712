use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::route::Route;

/// A shuttle known to the tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vehicle {
    pub id: i64,
    pub name: String,

    /// The key the iTRAK feed uses for this vehicle.
    pub tracker_id: String,
    pub enabled: bool,
}

impl Vehicle {
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>, tracker_id: impl Into<String>) -> Self {
        Self { id, name: name.into(), tracker_id: tracker_id.into(), enabled: true }
    }
}

/// Vehicles and routes used to seed a store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Fleet {
    pub vehicles: Vec<Vehicle>,
    pub routes: Vec<Route>,
}

impl Fleet {
    /// Load a fleet from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or is not a valid fleet
    /// document.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            std::fs::read(path).with_context(|| format!("reading fleet file {}", path.display()))?;
        serde_json::from_slice(&bytes).context("deserializing fleet file")
    }
}
