//! Task that owns the resolver and drives its searches.
//!
//! Location events arrive over an mpsc channel; the current state is
//! published on a watch channel after every event and every search result.
//! The in-flight search is polled in the same `select!` loop as the inbox, so
//! a location fix that arrives mid-search is seen and dropped rather than
//! queued behind the search.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::FutureExt;
use futures::future::BoxFuture;
use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use crate::domain::{Coordinate, Place, StationName};
use crate::location::{AuthorizationStatus, LocationError, LocationEvent};
use crate::places::{PlaceQuery, PlaceSearch, PlacesError};
use crate::stations::StationLineIndex;

use super::config::ResolverConfig;
use super::machine::{NearestStationResolver, ResolverState, Transition};

/// Inbox capacity for location events.
const EVENT_BUFFER: usize = 64;

type SearchFuture = BoxFuture<'static, Result<Vec<Place>, PlacesError>>;

/// The converged station with its lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearestStation {
    pub place: Place,
    /// Name with any station marker removed, as used by the line index.
    pub name: StationName,
    pub distance_m: f64,
    /// Lines serving the station, in table order.
    pub lines: Vec<String>,
    pub resolved_at: DateTime<Utc>,
}

/// Everything a client needs to render the resolver.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolverSnapshot {
    pub state: ResolverState,
    pub radius: f64,
    pub location: Option<Coordinate>,
    pub nearest: Option<NearestStation>,
    pub authorization: AuthorizationStatus,
    /// Error implied by the authorization status; cleared once authorized.
    pub authorization_error: Option<LocationError>,
    /// Last error reported by the geolocation provider.
    pub location_error: Option<LocationError>,
}

/// Returned when the resolver task has shut down.
#[derive(Debug, Clone, thiserror::Error)]
#[error("resolver task has stopped")]
pub struct ResolverClosed;

/// Handle to a running resolver task.
#[derive(Debug, Clone)]
pub struct ResolverHandle {
    events: mpsc::Sender<LocationEvent>,
    snapshot: watch::Receiver<ResolverSnapshot>,
}

impl ResolverHandle {
    /// Deliver a location event to the resolver.
    pub async fn send(&self, event: LocationEvent) -> Result<(), ResolverClosed> {
        self.events.send(event).await.map_err(|_| ResolverClosed)
    }

    /// Current resolver state.
    pub fn snapshot(&self) -> ResolverSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Receiver that is notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<ResolverSnapshot> {
        self.snapshot.clone()
    }

    /// Last location the resolver searched from.
    pub fn last_location(&self) -> Option<Coordinate> {
        self.snapshot.borrow().location
    }
}

/// Spawn the resolver task on the current tokio runtime.
///
/// The task runs until every [`ResolverHandle`] has been dropped.
pub fn spawn<P>(
    provider: Arc<P>,
    index: Arc<StationLineIndex>,
    config: ResolverConfig,
) -> ResolverHandle
where
    P: PlaceSearch + 'static,
{
    let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
    let machine = NearestStationResolver::new(config);
    let (snapshot_tx, snapshot_rx) = watch::channel(ResolverSnapshot::idle(machine.radius()));

    let task = ResolverTask {
        provider,
        index,
        machine,
        nearest: None,
        authorization: AuthorizationStatus::default(),
        location_error: None,
        snapshot: snapshot_tx,
    };
    tokio::spawn(task.run(events_rx));

    ResolverHandle {
        events: events_tx,
        snapshot: snapshot_rx,
    }
}

impl ResolverSnapshot {
    fn idle(radius: f64) -> Self {
        Self {
            state: ResolverState::Idle,
            radius,
            location: None,
            nearest: None,
            authorization: AuthorizationStatus::default(),
            authorization_error: None,
            location_error: None,
        }
    }
}

struct ResolverTask<P> {
    provider: Arc<P>,
    index: Arc<StationLineIndex>,
    machine: NearestStationResolver,
    nearest: Option<NearestStation>,
    authorization: AuthorizationStatus,
    location_error: Option<LocationError>,
    snapshot: watch::Sender<ResolverSnapshot>,
}

impl<P: PlaceSearch + 'static> ResolverTask<P> {
    async fn run(mut self, mut events: mpsc::Receiver<LocationEvent>) {
        let mut in_flight: Option<SearchFuture> = None;

        loop {
            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else {
                        debug!("all resolver handles dropped; stopping");
                        break;
                    };
                    if let Some(query) = self.handle_event(event) {
                        in_flight = Some(self.start_search(query));
                    }
                }
                result = poll_search(&mut in_flight) => {
                    in_flight = None;
                    if let Some(query) = self.handle_result(result) {
                        in_flight = Some(self.start_search(query));
                    }
                }
            }
            self.publish();
        }
    }

    fn handle_event(&mut self, event: LocationEvent) -> Option<PlaceQuery> {
        match event {
            LocationEvent::Update(location) => match self.machine.on_location(location) {
                Transition::Search(query) => {
                    self.location_error = None;
                    Some(query)
                }
                _ => None,
            },
            LocationEvent::Authorization { status } => {
                info!(?status, "location authorization changed");
                self.authorization = status;
                None
            }
            LocationEvent::Error { error } => {
                info!("location provider error: {error}");
                self.location_error = Some(error);
                None
            }
        }
    }

    fn handle_result(&mut self, result: Result<Vec<Place>, PlacesError>) -> Option<PlaceQuery> {
        match self.machine.on_search_result(result) {
            Transition::Search(query) => Some(query),
            Transition::Converged {
                station,
                distance_m,
            } => {
                let name = StationName::new(&station.name);
                let lines = self.index.lines_for(name.as_str()).to_vec();
                debug!(station = %name, lines = lines.len(), "looked up lines");
                self.nearest = Some(NearestStation {
                    place: station,
                    name,
                    distance_m,
                    lines,
                    resolved_at: Utc::now(),
                });
                None
            }
            Transition::Failed(_) | Transition::Ignored => None,
        }
    }

    fn start_search(&self, query: PlaceQuery) -> SearchFuture {
        let provider = Arc::clone(&self.provider);
        async move { provider.search(&query).await }.boxed()
    }

    fn publish(&self) {
        self.snapshot.send_replace(ResolverSnapshot {
            state: self.machine.state().clone(),
            radius: self.machine.radius(),
            location: self.machine.location(),
            nearest: self.nearest.clone(),
            authorization: self.authorization,
            authorization_error: self.authorization.error(),
            location_error: self.location_error,
        });
    }
}

/// Await the in-flight search, or never resolve if there is none.
async fn poll_search(in_flight: &mut Option<SearchFuture>) -> Result<Vec<Place>, PlacesError> {
    match in_flight {
        Some(search) => search.await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
