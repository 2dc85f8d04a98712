use serde::{Deserialize, Serialize};

/// A point on a route polyline, in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Planar distance in degree space. Not a geodesic distance.
    #[must_use]
    pub fn planar_distance(&self, other: &Self) -> f64 {
        (self.latitude - other.latitude).hypot(self.longitude - other.longitude)
    }
}

/// A predefined shuttle route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Route {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub enabled: bool,
    pub active: bool,
    pub color: String,

    /// Ordered polyline approximating the route's path.
    pub points: Vec<Point>,
}

impl Route {
    /// Whether the route may be assigned to a vehicle.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.enabled && self.active
    }

    /// Distance from `point` to the closest polyline point, or infinity for a
    /// route without points.
    #[must_use]
    pub fn nearest_distance(&self, point: &Point) -> f64 {
        self.points.iter().map(|p| p.planar_distance(point)).fold(f64::INFINITY, f64::min)
    }
}
