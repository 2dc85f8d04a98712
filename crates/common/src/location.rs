use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::route::Point;

/// A single observed position of a vehicle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Assigned by the store on creation.
    pub id: i64,
    pub tracker_id: String,
    pub latitude: f64,
    pub longitude: f64,

    /// Heading in degrees.
    pub heading: f64,

    /// Speed in miles per hour.
    pub speed: f64,

    /// When the feed observed the vehicle here.
    pub time: DateTime<Utc>,
    pub route_id: Option<i64>,

    /// Assigned by the store on creation.
    pub created: Option<DateTime<Utc>>,
}

impl Location {
    #[must_use]
    pub const fn point(&self) -> Point {
        Point::new(self.latitude, self.longitude)
    }
}
