//! Route guessing
//!
//! A vehicle is placed on the route whose polyline its recent positions
//! hug most closely. Distances are planar, in degrees.

use anyhow::Context;
use chrono::{Duration, Utc};
use common::{Location, ModelService, Route, Vehicle};
use tracing::debug;

use crate::error::Result;

/// How far back to look for a vehicle's positions.
pub const HISTORY_WINDOW: Duration = Duration::minutes(15);

/// Fewest positions needed before guessing.
pub const MIN_SAMPLES: usize = 5;

/// Positions farther than this from a route are penalised.
pub const PROXIMITY_THRESHOLD: f64 = 0.003;

/// Added to the distance of a position beyond [`PROXIMITY_THRESHOLD`].
pub const DISTANCE_PENALTY: f64 = 50.0;

/// Best average distances above this mean the vehicle is on no route.
pub const AMBIGUITY_THRESHOLD: f64 = 5.0;

/// Guess which route `vehicle` is currently on.
///
/// Returns `Ok(None)` when there is too little recent history or no route is
/// close enough.
///
/// # Errors
///
/// Returns `Error::Storage` when routes or history cannot be read.
pub async fn guess(vehicle: &Vehicle, store: &impl ModelService) -> Result<Option<Route>> {
    let routes = store.routes().await.context("fetching routes")?;
    let since = Utc::now() - HISTORY_WINDOW;
    let history =
        store.locations_since(vehicle.id, since).await.context("fetching recent locations")?;

    if history.len() < MIN_SAMPLES {
        debug!(
            vehicle = %vehicle.name,
            updates = history.len(),
            "too few recent updates to guess route"
        );
        return Ok(None);
    }

    let Some((route_id, distance)) = closest_route(&routes, &history) else {
        debug!(vehicle = %vehicle.name, "no route in contention");
        return Ok(None);
    };
    if distance > AMBIGUITY_THRESHOLD {
        debug!(vehicle = %vehicle.name, distance, "not on route");
        return Ok(None);
    }

    let route = store.route(route_id).await.context("fetching guessed route")?;
    if !route.is_available() {
        debug!(vehicle = %vehicle.name, route = %route.name, "guessed route no longer available");
        return Ok(None);
    }

    debug!(vehicle = %vehicle.name, route = %route.name, distance, "guessed route");
    Ok(Some(route))
}

/// The route with the smallest average distance to `history`, with that
/// distance.
///
/// Routes are compared in ascending id order and only a strictly smaller
/// average wins, so ties go to the lowest id. Returns `None` when no route has
/// a finite distance.
#[must_use]
pub fn closest_route(routes: &[Route], history: &[Location]) -> Option<(i64, f64)> {
    let mut ordered: Vec<&Route> = routes.iter().collect();
    ordered.sort_by_key(|r| r.id);

    let mut best: Option<(i64, f64)> = None;
    for route in ordered {
        let distance = average_distance(route, history);
        if distance.is_finite() && best.is_none_or(|(_, d)| distance < d) {
            best = Some((route.id, distance));
        }
    }
    best
}

/// Mean penalised distance from each position to `route`.
///
/// Disabled or inactive routes are infinitely far.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_distance(route: &Route, history: &[Location]) -> f64 {
    if !route.is_available() || history.is_empty() {
        return f64::INFINITY;
    }

    let total: f64 = history
        .iter()
        .map(|location| {
            let nearest = route.nearest_distance(&location.point());
            if nearest > PROXIMITY_THRESHOLD { nearest + DISTANCE_PENALTY } else { nearest }
        })
        .sum();
    total / history.len() as f64
}
