//! Driving directions.
//!
//! Route computation is delegated to an external provider. Failures are
//! swallowed by [`DirectionsService`]: a missing route is reported as `None`.

mod client;
mod error;

use std::future::Future;

use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::Coordinate;

pub use client::{OsrmClient, OsrmConfig};
pub use error::DirectionsError;

/// A computed driving route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    /// Route length in metres.
    pub distance_m: f64,
    /// Expected travel time in seconds.
    pub expected_travel_time_s: f64,
    /// Polyline from origin to destination.
    pub geometry: Vec<Coordinate>,
}

/// A directions provider.
pub trait DirectionsProvider: Send + Sync {
    fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> impl Future<Output = Result<Route, DirectionsError>> + Send;
}

/// Routes from the user's location to a chosen place.
pub struct DirectionsService<D> {
    provider: D,
}

impl<D: DirectionsProvider> DirectionsService<D> {
    pub fn new(provider: D) -> Self {
        Self { provider }
    }

    /// Route from `origin` to `destination`.
    ///
    /// Returns `None` when the origin is unknown or the provider fails.
    pub async fn route_to(
        &self,
        destination: Coordinate,
        origin: Option<Coordinate>,
    ) -> Option<Route> {
        let Some(origin) = origin else {
            debug!("no known location; skipping directions");
            return None;
        };

        match self.provider.route(origin, destination).await {
            Ok(route) => Some(route),
            Err(e) => {
                warn!("directions failed: {e}");
                None
            }
        }
    }
}
