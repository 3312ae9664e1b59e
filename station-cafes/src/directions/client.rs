//! OSRM driving-route client.

use serde::Deserialize;
use tracing::debug;

use crate::domain::Coordinate;

use super::error::DirectionsError;
use super::{DirectionsProvider, Route};

/// Default base URL for the public OSRM demo server.
const DEFAULT_BASE_URL: &str = "https://router.project-osrm.org";

/// Configuration for the OSRM client.
#[derive(Debug, Clone)]
pub struct OsrmConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OsrmConfig {
    /// Set a custom base URL (self-hosted instance or testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<RouteDto>,
}

#[derive(Debug, Deserialize)]
struct RouteDto {
    distance: f64,
    duration: f64,
    geometry: GeometryDto,
}

/// GeoJSON LineString; positions are `[lon, lat]`.
#[derive(Debug, Deserialize)]
struct GeometryDto {
    coordinates: Vec<[f64; 2]>,
}

impl RouteResponse {
    fn into_route(self) -> Result<Route, DirectionsError> {
        if self.code != "Ok" {
            return Err(DirectionsError::NoRoute(
                self.message.unwrap_or(self.code),
            ));
        }

        let route = self
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| DirectionsError::NoRoute("no routes returned".to_string()))?;

        let geometry = route
            .geometry
            .coordinates
            .into_iter()
            .filter_map(|[lon, lat]| Coordinate::new(lat, lon).ok())
            .collect();

        Ok(Route {
            distance_m: route.distance,
            expected_travel_time_s: route.duration,
            geometry,
        })
    }
}

/// Client for an OSRM-compatible `/route/v1/driving` endpoint.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    http: reqwest::Client,
    base_url: String,
}

impl OsrmClient {
    /// Create a new client.
    pub fn new(config: OsrmConfig) -> Result<Self, DirectionsError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn route_url(&self, origin: Coordinate, destination: Coordinate) -> String {
        format!(
            "{}/route/v1/driving/{},{};{},{}?overview=full&geometries=geojson",
            self.base_url,
            origin.longitude(),
            origin.latitude(),
            destination.longitude(),
            destination.latitude(),
        )
    }
}

impl DirectionsProvider for OsrmClient {
    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Route, DirectionsError> {
        let url = self.route_url(origin, destination);
        debug!(%url, "osrm route");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        // OSRM reports routing failures as 400 with a JSON body carrying `code`.
        match serde_json::from_str::<RouteResponse>(&body) {
            Ok(parsed) => parsed.into_route(),
            Err(_) if !status.is_success() => Err(DirectionsError::Api {
                status: status.as_u16(),
                message: body,
            }),
            Err(e) => Err(DirectionsError::Json {
                message: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = OsrmConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn route_url_is_lon_lat() {
        let client =
            OsrmClient::new(OsrmConfig::default().with_base_url("http://localhost:5000/")).unwrap();
        let url = client.route_url(
            Coordinate::new(35.5, 139.25).unwrap(),
            Coordinate::new(35.75, 139.5).unwrap(),
        );
        assert_eq!(
            url,
            "http://localhost:5000/route/v1/driving/139.25,35.5;139.5,35.75?overview=full&geometries=geojson"
        );
    }

    #[test]
    fn parse_ok_response() {
        let json = r#"{
            "code": "Ok",
            "routes": [{
                "distance": 1234.5,
                "duration": 300.0,
                "geometry": {"type": "LineString", "coordinates": [[139.70, 35.65], [139.71, 35.66]]}
            }],
            "waypoints": []
        }"#;
        let route = serde_json::from_str::<RouteResponse>(json)
            .unwrap()
            .into_route()
            .unwrap();

        assert_eq!(route.distance_m, 1234.5);
        assert_eq!(route.expected_travel_time_s, 300.0);
        assert_eq!(route.geometry.len(), 2);
        assert_eq!(route.geometry[0].latitude(), 35.65);
        assert_eq!(route.geometry[0].longitude(), 139.70);
    }

    #[test]
    fn parse_error_code() {
        let json = r#"{"code": "NoRoute", "message": "Impossible route between points"}"#;
        let err = serde_json::from_str::<RouteResponse>(json)
            .unwrap()
            .into_route()
            .unwrap_err();
        assert!(matches!(err, DirectionsError::NoRoute(m) if m.contains("Impossible")));
    }

    #[test]
    fn ok_without_routes_is_no_route() {
        let json = r#"{"code": "Ok", "routes": []}"#;
        let err = serde_json::from_str::<RouteResponse>(json)
            .unwrap()
            .into_route()
            .unwrap_err();
        assert!(matches!(err, DirectionsError::NoRoute(_)));
    }
}
