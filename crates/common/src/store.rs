//! In-memory `ModelService`.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::fleet::{Fleet, Vehicle};
use crate::location::Location;
use crate::model::ModelService;
use crate::route::Route;

/// Keeps vehicles, routes and locations in process memory.
///
/// Cloning is cheap and clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    vehicles: BTreeMap<i64, Vehicle>,
    routes: BTreeMap<i64, Route>,
    locations: Vec<Location>,
    next_location_id: i64,
}

impl Inner {
    fn tracker_id(&self, vehicle_id: i64) -> Option<&str> {
        self.vehicles.get(&vehicle_id).map(|v| v.tracker_id.as_str())
    }
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_fleet(fleet: Fleet) -> Self {
        let inner = Inner {
            vehicles: fleet.vehicles.into_iter().map(|v| (v.id, v)).collect(),
            routes: fleet.routes.into_iter().map(|r| (r.id, r)).collect(),
            ..Inner::default()
        };
        Self { inner: Arc::new(RwLock::new(inner)) }
    }

    /// Add or replace a vehicle.
    pub async fn put_vehicle(&self, vehicle: Vehicle) {
        self.inner.write().await.vehicles.insert(vehicle.id, vehicle);
    }

    /// Add or replace a route.
    pub async fn put_route(&self, route: Route) {
        self.inner.write().await.routes.insert(route.id, route);
    }

    /// All stored locations in insertion order.
    pub async fn locations(&self) -> Vec<Location> {
        self.inner.read().await.locations.clone()
    }
}

#[async_trait]
impl ModelService for MemoryStore {
    async fn vehicle_with_tracker_id(&self, tracker_id: &str) -> Result<Option<Vehicle>> {
        let inner = self.inner.read().await;
        Ok(inner.vehicles.values().find(|v| v.tracker_id == tracker_id).cloned())
    }

    async fn latest_location(&self, vehicle_id: i64) -> Result<Option<Location>> {
        let inner = self.inner.read().await;
        let Some(tracker_id) = inner.tracker_id(vehicle_id) else {
            return Ok(None);
        };
        Ok(inner.locations.iter().rev().find(|l| l.tracker_id == tracker_id).cloned())
    }

    async fn locations_since(
        &self, vehicle_id: i64, since: DateTime<Utc>,
    ) -> Result<Vec<Location>> {
        let inner = self.inner.read().await;
        let Some(tracker_id) = inner.tracker_id(vehicle_id) else {
            return Ok(vec![]);
        };
        Ok(inner
            .locations
            .iter()
            .filter(|l| l.tracker_id == tracker_id && l.time >= since)
            .cloned()
            .collect())
    }

    async fn routes(&self) -> Result<Vec<Route>> {
        Ok(self.inner.read().await.routes.values().cloned().collect())
    }

    async fn route(&self, id: i64) -> Result<Route> {
        let inner = self.inner.read().await;
        inner.routes.get(&id).cloned().ok_or_else(|| anyhow!("route {id} not found"))
    }

    async fn create_location(&self, mut location: Location) -> Result<Location> {
        let mut inner = self.inner.write().await;
        inner.next_location_id += 1;
        location.id = inner.next_location_id;
        location.created = Some(Utc::now());
        inner.locations.push(location.clone());
        Ok(location)
    }

    async fn delete_locations_before(&self, before: DateTime<Utc>) -> Result<u64> {
        let mut inner = self.inner.write().await;
        let count = inner.locations.len();
        inner.locations.retain(|l| l.time >= before);
        let deleted = count - inner.locations.len();
        tracing::trace!(deleted, "pruned in-memory locations");
        Ok(deleted as u64)
    }
}
