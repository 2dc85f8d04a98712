use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use common::{Location, MemoryStore, Route, Vehicle};
use http::{Request, Response};
use updater::{HttpRequest, ModelService};

/// Host services backing the updater: outbound HTTP and the location store.
#[derive(Debug, Clone)]
pub struct Provider {
    client: reqwest::Client,
    store: MemoryStore,
}

impl Provider {
    pub fn new(store: MemoryStore) -> Self {
        Self { client: reqwest::Client::new(), store }
    }
}

impl updater::Provider for Provider {}

impl HttpRequest for Provider {
    async fn fetch(&self, request: Request<Bytes>) -> Result<Response<Bytes>> {
        let request = reqwest::Request::try_from(request).context("converting request")?;
        let response = self.client.execute(request).await.context("sending request")?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.context("reading response body")?;

        let mut reply = Response::new(body);
        *reply.status_mut() = status;
        *reply.headers_mut() = headers;
        Ok(reply)
    }
}

#[async_trait]
impl ModelService for Provider {
    async fn vehicle_with_tracker_id(&self, tracker_id: &str) -> Result<Option<Vehicle>> {
        self.store.vehicle_with_tracker_id(tracker_id).await
    }

    async fn latest_location(&self, vehicle_id: i64) -> Result<Option<Location>> {
        self.store.latest_location(vehicle_id).await
    }

    async fn locations_since(
        &self, vehicle_id: i64, since: DateTime<Utc>,
    ) -> Result<Vec<Location>> {
        self.store.locations_since(vehicle_id, since).await
    }

    async fn routes(&self) -> Result<Vec<Route>> {
        self.store.routes().await
    }

    async fn route(&self, id: i64) -> Result<Route> {
        self.store.route(id).await
    }

    async fn create_location(&self, location: Location) -> Result<Location> {
        self.store.create_location(location).await
    }

    async fn delete_locations_before(&self, before: DateTime<Utc>) -> Result<u64> {
        self.store.delete_locations_before(before).await
    }
}
