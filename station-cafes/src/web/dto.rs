//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::directions::Route;
use crate::domain::Place;

/// Lines serving a station.
#[derive(Debug, Serialize)]
pub struct StationLinesResponse {
    /// Station name with any station marker removed
    pub station: String,

    /// Lines in table order
    pub lines: Vec<String>,
}

/// Every line in the index.
#[derive(Debug, Serialize)]
pub struct LinesResponse {
    pub lines: Vec<String>,
}

/// Stations on a line.
#[derive(Debug, Serialize)]
pub struct LineStationsResponse {
    pub line: String,

    /// Stations in table order
    pub stations: Vec<String>,
}

/// Cafés near a station.
#[derive(Debug, Serialize)]
pub struct CafesResponse {
    pub station: String,

    /// Places in provider ranking order
    pub cafes: Vec<Place>,
}

/// Request for a route to a chosen place.
#[derive(Debug, Deserialize)]
pub struct DirectionsRequest {
    /// Destination latitude in degrees
    pub latitude: f64,

    /// Destination longitude in degrees
    pub longitude: f64,
}

/// Route from the last known location, if one could be computed.
#[derive(Debug, Serialize)]
pub struct DirectionsResponse {
    pub route: Option<Route>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinate;

    #[test]
    fn directions_response_without_route_is_null() {
        let json = serde_json::to_value(DirectionsResponse { route: None }).unwrap();
        assert_eq!(json, serde_json::json!({ "route": null }));
    }

    #[test]
    fn directions_response_with_route() {
        let origin = Coordinate::new(35.658, 139.7016).unwrap();
        let destination = Coordinate::new(35.6676, 139.6922).unwrap();
        let response = DirectionsResponse {
            route: Some(Route {
                distance_m: 1520.5,
                expected_travel_time_s: 240.0,
                geometry: vec![origin, destination],
            }),
        };

        let json = serde_json::to_value(response).unwrap();
        assert_eq!(json["route"]["distance_m"], 1520.5);
        assert_eq!(json["route"]["geometry"][1]["latitude"], 35.6676);
    }

    #[test]
    fn cafes_response_omits_missing_fields() {
        let response = CafesResponse {
            station: "渋谷".into(),
            cafes: vec![Place::new(
                "Fuglen Tokyo",
                Coordinate::new(35.66758, 139.69216).unwrap(),
            )],
        };

        let json = serde_json::to_value(response).unwrap();
        assert_eq!(json["station"], "渋谷");
        assert_eq!(json["cafes"][0]["name"], "Fuglen Tokyo");
        assert!(json["cafes"][0].get("url").is_none());
    }

    #[test]
    fn parse_directions_request() {
        let req: DirectionsRequest =
            serde_json::from_str(r#"{"latitude": 35.6676, "longitude": 139.6922}"#).unwrap();
        assert_eq!(req.latitude, 35.6676);
        assert_eq!(req.longitude, 139.6922);
    }
}
