//! # Model Service
//!
//! Storage interface for vehicles, routes and locations.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::fleet::Vehicle;
use crate::location::Location;
use crate::route::Route;

/// The persistence collaborator consumed by the updater.
///
/// Lookups that can legitimately miss return `Ok(None)`. Every `Err` is a
/// storage failure.
///
/// Time filters compare against each location's observation `time`, which the
/// feed reports in UTC. A feed clock in another zone shifts the history window
/// and the retention cutoff by that offset.
#[async_trait]
pub trait ModelService: Send + Sync + 'static {
    /// Find the vehicle the feed identifies by `tracker_id`.
    async fn vehicle_with_tracker_id(&self, tracker_id: &str) -> Result<Option<Vehicle>>;

    /// The location most recently stored for the vehicle.
    ///
    /// Insertion order decides, not observation time: a late record carrying
    /// an older timestamp becomes the latest once stored.
    async fn latest_location(&self, vehicle_id: i64) -> Result<Option<Location>>;

    /// Locations for the vehicle observed at or after `since`.
    async fn locations_since(&self, vehicle_id: i64, since: DateTime<Utc>)
    -> Result<Vec<Location>>;

    async fn routes(&self) -> Result<Vec<Route>>;

    /// Fetch a single route. A missing route is an error.
    async fn route(&self, id: i64) -> Result<Route>;

    /// Store a new location, returning it with its assigned id.
    async fn create_location(&self, location: Location) -> Result<Location>;

    /// Delete locations observed before `before`, returning how many were
    /// removed.
    async fn delete_locations_before(&self, before: DateTime<Utc>) -> Result<u64>;
}
