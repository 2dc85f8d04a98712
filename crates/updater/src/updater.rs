//! # Update cycle
//!
//! Each cycle fetches the data feed, handles every record concurrently and
//! waits for all of them before pruning old locations.

use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Months, Utc};
use common::Location;
use itrak::Record;
use tokio::task::JoinSet;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::feed::{self, DataFeedResponse};
use crate::key_locker::KeyLocker;
use crate::last_response::LastResponseCache;
use crate::provider::Provider;
use crate::route_guess;

/// Locations observed longer ago than this are deleted after each cycle.
pub const RETENTION: Months = Months::new(1);

/// Outcome counts for a completed cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Records found in the feed.
    pub records: usize,

    /// Records stored as new locations.
    pub stored: usize,

    /// Records whose timestamp matched the vehicle's latest location.
    pub duplicates: usize,

    /// Records dropped for any other reason.
    pub skipped: usize,

    /// Locations removed by retention.
    pub pruned: u64,
}

/// Periodically pulls the data feed into the store.
#[derive(Debug)]
pub struct Updater<P: Provider> {
    config: Config,
    provider: Arc<P>,
    last_response: Arc<LastResponseCache>,
    vehicle_locks: KeyLocker,
}

impl<P: Provider> Updater<P> {
    #[must_use]
    pub fn new(config: Config, provider: Arc<P>) -> Self {
        Self {
            config,
            provider,
            last_response: Arc::new(LastResponseCache::new()),
            vehicle_locks: KeyLocker::new(),
        }
    }

    /// Shared handle to the last response cache.
    #[must_use]
    pub fn cache(&self) -> Arc<LastResponseCache> {
        Arc::clone(&self.last_response)
    }

    /// The most recent successful data feed response.
    #[must_use]
    pub fn last_response(&self) -> Option<Arc<DataFeedResponse>> {
        self.last_response.get()
    }

    /// Run update cycles forever, one per configured interval.
    ///
    /// The first cycle runs immediately. Cycles never overlap; a cycle that
    /// overruns the interval delays the next tick rather than queueing extra
    /// ones.
    pub async fn run(&self) {
        info!(
            data_feed = %self.config.data_feed,
            interval = ?self.config.update_interval,
            "starting updater"
        );

        let mut ticker = time::interval(self.config.update_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            match self.update().await {
                Ok(report) => debug!(?report, "update cycle complete"),
                Err(e) => {
                    error!(monotonic_counter.cycle_errors = 1, error = %e, "update cycle skipped");
                }
            }
        }
    }

    /// Run a single update cycle.
    ///
    /// Per-record failures are logged and counted, never returned.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` or `Error::BadStatus` when the data feed
    /// could not be fetched. Nothing is stored or pruned in that case.
    pub async fn update(&self) -> Result<CycleReport> {
        let response = feed::fetch(&self.config.data_feed, self.provider.as_ref()).await?;
        let body = response.text().into_owned();
        self.last_response.set(response);

        let records = itrak::split_records(&body);
        let mut report = CycleReport { records: records.len(), ..CycleReport::default() };

        let mut tasks = JoinSet::new();
        for record in records {
            let provider = Arc::clone(&self.provider);
            let locks = self.vehicle_locks.clone();
            let record = record.to_string();
            tasks.spawn(async move {
                handle_vehicle_data(provider.as_ref(), &locks, &record).await
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(location)) => {
                    report.stored += 1;
                    debug!(
                        monotonic_counter.locations_stored = 1,
                        tracker_id = %location.tracker_id,
                        route_id = ?location.route_id,
                        "stored location"
                    );
                }
                Ok(Err(Error::Duplicate)) => report.duplicates += 1,
                Ok(Err(e @ Error::UnknownVehicle(_))) => {
                    report.skipped += 1;
                    warn!(monotonic_counter.unknown_vehicles = 1, "{e}");
                }
                Ok(Err(e)) => {
                    report.skipped += 1;
                    error!(monotonic_counter.processing_errors = 1, error = %e, "skipping record");
                }
                Err(e) => {
                    report.skipped += 1;
                    error!(
                        monotonic_counter.processing_errors = 1,
                        error = %e,
                        "record task failed"
                    );
                }
            }
        }

        match prune(self.provider.as_ref()).await {
            Ok(pruned) => report.pruned = pruned,
            Err(e) => error!(error = %e, "retention skipped"),
        }

        Ok(report)
    }
}

/// Store a location for a single feed record.
///
/// Records for the same vehicle are handled one at a time, so the duplicate
/// check always sees a location stored by a concurrent sibling.
///
/// # Errors
///
/// Returns `Error::Parse` for a malformed record, `Error::UnknownVehicle` when
/// no vehicle has the record's tracker id, `Error::Duplicate` when the
/// vehicle's latest location has the same timestamp, and `Error::Storage` when
/// the store fails.
pub async fn handle_vehicle_data(
    provider: &impl Provider, locks: &KeyLocker, record: &str,
) -> Result<Location> {
    let record: Record = record.parse()?;
    let _guard = locks.lock(&record.vehicle_id).await;

    let vehicle = provider
        .vehicle_with_tracker_id(&record.vehicle_id)
        .await
        .context("fetching vehicle")?
        .ok_or_else(|| Error::UnknownVehicle(record.vehicle_id.clone()))?;

    let time = record.timestamp()?;

    let latest = provider.latest_location(vehicle.id).await.context("fetching latest location")?;
    if latest.is_some_and(|last| last.time == time) {
        debug!(vehicle = %vehicle.name, %time, "duplicate observation");
        return Err(Error::Duplicate);
    }

    let route = route_guess::guess(&vehicle, provider).await?;

    let location = Location {
        tracker_id: record.vehicle_id.clone(),
        latitude: record.latitude()?,
        longitude: record.longitude()?,
        heading: record.heading()?,
        speed: record.speed_mph()?,
        time,
        route_id: route.map(|r| r.id),
        ..Location::default()
    };

    let created = provider.create_location(location).await.context("creating location")?;
    Ok(created)
}

/// Oldest observation time kept when pruning at `now`.
///
/// Day of month is clamped to the shorter month: 31 March keeps everything
/// from 28 (or 29) February.
#[must_use]
pub fn retention_cutoff(now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    now.checked_sub_months(RETENTION)
}

/// Delete locations older than [`RETENTION`].
async fn prune(provider: &impl Provider) -> Result<u64> {
    let Some(cutoff) = retention_cutoff(Utc::now()) else {
        return Err(Error::Retention("cutoff out of range".to_string()));
    };

    let deleted = provider
        .delete_locations_before(cutoff)
        .await
        .map_err(|e| Error::Retention(format!("unable to remove old locations: {e:#}")))?;
    if deleted > 0 {
        debug!(deleted, %cutoff, "removed old locations");
    }
    Ok(deleted)
}
