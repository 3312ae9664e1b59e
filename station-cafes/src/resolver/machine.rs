//! Radius-expanding nearest-station state machine.
//!
//! The machine is pure: it decides which search to issue next and how to
//! interpret each result, but never calls a provider itself. The owning task
//! in [`super::task`] performs the searches and feeds results back in.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::{Coordinate, Place, Region};
use crate::places::{PlaceQuery, PlacesError};

use super::config::ResolverConfig;

/// Failure message when the search region is exhausted.
pub const NO_STATION_FOUND: &str = "no nearby station found";

/// Observable resolver state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResolverState {
    Idle,
    Searching { radius: f64 },
    Converged { station: Place },
    Failed { message: String },
}

/// What the owner should do after feeding an input to the machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Issue this search and report its result.
    Search(PlaceQuery),
    /// A station within range was found.
    Converged { station: Place, distance_m: f64 },
    /// The search ended without a station.
    Failed(String),
    /// Input was dropped; nothing changed.
    Ignored,
}

/// Nearest-station resolver.
///
/// `Idle → Searching → {Converged, Failed}`. A location fix while not
/// searching starts a new search at the initial radius; a fix that arrives
/// mid-search is dropped, so at most one search is ever outstanding.
#[derive(Debug, Clone)]
pub struct NearestStationResolver {
    config: ResolverConfig,
    state: ResolverState,
    radius: f64,
    location: Option<Coordinate>,
    nearest: Option<Place>,
}

impl NearestStationResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            radius: config.initial_radius,
            config,
            state: ResolverState::Idle,
            location: None,
            nearest: None,
        }
    }

    pub fn state(&self) -> &ResolverState {
        &self.state
    }

    /// Span of the current (or last) search region, in degrees.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Location the current (or last) search is centered on.
    pub fn location(&self) -> Option<Coordinate> {
        self.location
    }

    /// Most recently converged station, kept across later failures.
    pub fn nearest(&self) -> Option<&Place> {
        self.nearest.as_ref()
    }

    pub fn is_searching(&self) -> bool {
        matches!(self.state, ResolverState::Searching { .. })
    }

    /// Feed a location fix.
    pub fn on_location(&mut self, location: Coordinate) -> Transition {
        if self.is_searching() {
            debug!(radius = self.radius, "search in flight; dropping location update");
            return Transition::Ignored;
        }

        self.location = Some(location);
        self.radius = self.config.initial_radius;
        self.begin_search()
    }

    /// Feed the result of the search last returned by [`Transition::Search`].
    pub fn on_search_result(&mut self, result: Result<Vec<Place>, PlacesError>) -> Transition {
        if !self.is_searching() {
            return Transition::Ignored;
        }
        let Some(origin) = self.location else {
            return Transition::Ignored;
        };

        let places = match result {
            Ok(places) => places,
            Err(e) => return self.fail(e.to_string()),
        };

        // Provider order decides; no re-sorting by distance.
        let Some(candidate) = places.into_iter().next() else {
            debug!(radius = self.radius, "no stations in region");
            return self.widen();
        };

        let distance_m = origin.distance_to(&candidate.coordinate);
        if distance_m > self.config.max_distance_m {
            debug!(
                station = %candidate.name,
                distance_m,
                radius = self.radius,
                "candidate too far; widening"
            );
            return self.widen();
        }

        info!(station = %candidate.name, distance_m, "nearest station resolved");
        self.state = ResolverState::Converged {
            station: candidate.clone(),
        };
        self.nearest = Some(candidate.clone());
        Transition::Converged {
            station: candidate,
            distance_m,
        }
    }

    fn begin_search(&mut self) -> Transition {
        let Some(center) = self.location else {
            return Transition::Ignored;
        };

        self.state = ResolverState::Searching {
            radius: self.radius,
        };
        let query =
            PlaceQuery::new(&self.config.query).within(Region::square(center, self.radius));
        Transition::Search(query)
    }

    fn widen(&mut self) -> Transition {
        let next = self.radius * 2.0;
        if next > self.config.max_radius {
            return self.fail(NO_STATION_FOUND.to_string());
        }

        self.radius = next;
        debug!(radius = next, "retrying with wider region");
        self.begin_search()
    }

    fn fail(&mut self, message: String) -> Transition {
        warn!(radius = self.radius, "nearest station search failed: {message}");
        self.state = ResolverState::Failed {
            message: message.clone(),
        };
        Transition::Failed(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// User position: Shibuya.
    fn user() -> Coordinate {
        Coordinate::new(35.658, 139.7016).unwrap()
    }

    /// A place `metres` due north of the user.
    fn place_north(name: &str, metres: f64) -> Place {
        let lat = user().latitude() + metres / 111_195.0;
        Place::new(name, Coordinate::new(lat, user().longitude()).unwrap())
    }

    fn resolver() -> NearestStationResolver {
        NearestStationResolver::new(ResolverConfig::default())
    }

    fn expect_search(t: Transition) -> PlaceQuery {
        match t {
            Transition::Search(q) => q,
            other => panic!("expected search, got {other:?}"),
        }
    }

    #[test]
    fn starts_idle() {
        let r = resolver();
        assert_eq!(r.state(), &ResolverState::Idle);
        assert_eq!(r.radius(), 0.0005);
        assert!(r.location().is_none());
        assert!(r.nearest().is_none());
    }

    #[test]
    fn location_starts_search_at_initial_radius() {
        let mut r = resolver();
        let q = expect_search(r.on_location(user()));

        assert_eq!(q.text, "station");
        let region = q.region.unwrap();
        assert_eq!(region.center, user());
        assert_eq!(region.latitude_delta, 0.0005);
        assert_eq!(region.longitude_delta, 0.0005);
        assert_eq!(r.state(), &ResolverState::Searching { radius: 0.0005 });
    }

    #[test]
    fn near_candidate_converges_with_radius_unchanged() {
        let mut r = resolver();
        r.on_location(user());

        let station = place_north("渋谷駅", 3000.0);
        let t = r.on_search_result(Ok(vec![station.clone()]));

        match t {
            Transition::Converged {
                station: s,
                distance_m,
            } => {
                assert_eq!(s, station);
                assert!((distance_m - 3000.0).abs() < 5.0);
            }
            other => panic!("expected convergence, got {other:?}"),
        }
        assert_eq!(r.radius(), 0.0005);
        assert_eq!(r.nearest(), Some(&station));
        assert_eq!(
            r.state(),
            &ResolverState::Converged { station: station.clone() }
        );
    }

    #[test]
    fn far_candidate_doubles_region() {
        let mut r = resolver();
        let first = expect_search(r.on_location(user()));

        let second = expect_search(r.on_search_result(Ok(vec![place_north("Far", 6000.0)])));

        let first = first.region.unwrap();
        let second = second.region.unwrap();
        assert_eq!(second.latitude_delta, first.latitude_delta * 2.0);
        assert_eq!(second.longitude_delta, first.longitude_delta * 2.0);
        assert_eq!(second.center, first.center);
        assert_eq!(r.radius(), 0.001);
        assert!(r.is_searching());
        assert!(r.nearest().is_none());
    }

    #[test]
    fn candidate_at_exactly_max_distance_converges() {
        let station = place_north("Edge", 5000.0);
        let distance = user().distance_to(&station.coordinate);
        let mut r = NearestStationResolver::new(ResolverConfig::new(0.0005, 0.1, distance));
        r.on_location(user());

        assert!(matches!(
            r.on_search_result(Ok(vec![station])),
            Transition::Converged { .. }
        ));
    }

    #[test]
    fn first_result_wins_even_if_later_is_closer() {
        let mut r = resolver();
        r.on_location(user());

        let t = r.on_search_result(Ok(vec![
            place_north("First", 4000.0),
            place_north("Closer", 100.0),
        ]));
        assert!(matches!(t, Transition::Converged { station, .. } if station.name == "First"));
    }

    #[test]
    fn far_first_result_widens_even_if_later_is_near() {
        let mut r = resolver();
        r.on_location(user());

        let t = r.on_search_result(Ok(vec![
            place_north("Far", 7000.0),
            place_north("Near", 100.0),
        ]));
        assert!(matches!(t, Transition::Search(_)));
    }

    #[test]
    fn eight_empty_results_fail() {
        let mut r = resolver();
        let mut radii = vec![expect_search(r.on_location(user())).region.unwrap().latitude_delta];

        for _ in 0..7 {
            let q = expect_search(r.on_search_result(Ok(vec![])));
            radii.push(q.region.unwrap().latitude_delta);
        }
        assert_eq!(
            radii,
            [0.0005, 0.001, 0.002, 0.004, 0.008, 0.016, 0.032, 0.064]
        );

        let t = r.on_search_result(Ok(vec![]));
        assert_eq!(t, Transition::Failed(NO_STATION_FOUND.to_string()));
        assert_eq!(
            r.state(),
            &ResolverState::Failed {
                message: NO_STATION_FOUND.to_string()
            }
        );
        assert!(r.radius() <= 0.1);
    }

    #[test]
    fn far_candidates_also_exhaust_radius() {
        let mut r = resolver();
        r.on_location(user());

        let mut last = Transition::Ignored;
        for _ in 0..8 {
            last = r.on_search_result(Ok(vec![place_north("Far", 9000.0)]));
        }
        assert_eq!(last, Transition::Failed(NO_STATION_FOUND.to_string()));
    }

    #[test]
    fn provider_error_fails_without_retry() {
        let mut r = resolver();
        r.on_location(user());

        let t = r.on_search_result(Err(PlacesError::Api {
            status: 503,
            message: "unavailable".into(),
        }));
        match t {
            Transition::Failed(message) => assert!(message.contains("unavailable")),
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(!r.is_searching());
        assert_eq!(r.radius(), 0.0005);
    }

    #[test]
    fn location_while_searching_is_noop() {
        let mut r = resolver();
        r.on_location(user());
        r.on_search_result(Ok(vec![])); // widened to 0.001

        let elsewhere = Coordinate::new(35.7, 139.8).unwrap();
        assert_eq!(r.on_location(elsewhere), Transition::Ignored);
        assert_eq!(r.state(), &ResolverState::Searching { radius: 0.001 });
        assert_eq!(r.radius(), 0.001);
        assert_eq!(r.location(), Some(user()));
    }

    #[test]
    fn new_location_after_failure_restarts_at_initial_radius() {
        let mut r = resolver();
        r.on_location(user());
        for _ in 0..8 {
            r.on_search_result(Ok(vec![]));
        }
        assert!(matches!(r.state(), ResolverState::Failed { .. }));

        let elsewhere = Coordinate::new(35.7, 139.8).unwrap();
        let q = expect_search(r.on_location(elsewhere));
        assert_eq!(q.region.unwrap().latitude_delta, 0.0005);
        assert_eq!(r.location(), Some(elsewhere));
    }

    #[test]
    fn new_location_after_convergence_restarts_and_keeps_nearest() {
        let mut r = resolver();
        r.on_location(user());
        r.on_search_result(Ok(vec![]));
        r.on_search_result(Ok(vec![place_north("渋谷駅", 200.0)]));
        assert_eq!(r.radius(), 0.001);

        expect_search(r.on_location(user()));
        assert_eq!(r.radius(), 0.0005);
        assert_eq!(r.nearest().map(|p| p.name.as_str()), Some("渋谷駅"));
    }

    #[test]
    fn result_while_idle_is_ignored() {
        let mut r = resolver();
        assert_eq!(r.on_search_result(Ok(vec![])), Transition::Ignored);
        assert_eq!(r.state(), &ResolverState::Idle);
    }

    #[test]
    fn state_serializes_with_status_tag() {
        let json = serde_json::to_value(ResolverState::Searching { radius: 0.002 }).unwrap();
        assert_eq!(json["status"], "searching");
        assert_eq!(json["radius"], 0.002);

        let json = serde_json::to_value(ResolverState::Failed {
            message: NO_STATION_FOUND.into(),
        })
        .unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["message"], NO_STATION_FOUND);
    }
}
