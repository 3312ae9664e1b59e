//! Geographic coordinates, search regions and great-circle distance.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in metres.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Error returned when constructing an out-of-range coordinate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid coordinate ({latitude}, {longitude}): {reason}")]
pub struct InvalidCoordinate {
    latitude: f64,
    longitude: f64,
    reason: &'static str,
}

/// A WGS84 latitude/longitude pair in degrees.
///
/// Latitude is always within `-90..=90` and longitude within `-180..=180`.
/// Deserialization goes through the same validation as [`Coordinate::new`].
///
/// # Examples
///
/// ```
/// use station_cafes::domain::Coordinate;
///
/// let shibuya = Coordinate::new(35.658, 139.7016).unwrap();
/// assert_eq!(shibuya.latitude(), 35.658);
///
/// assert!(Coordinate::new(91.0, 0.0).is_err());
/// assert!(Coordinate::new(0.0, f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = InvalidCoordinate;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.latitude, raw.longitude)
    }
}

impl Coordinate {
    /// Create a coordinate, rejecting non-finite or out-of-range values.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinate> {
        let invalid = |reason| InvalidCoordinate {
            latitude,
            longitude,
            reason,
        };

        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(invalid("must be finite"));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(invalid("latitude must be within -90..=90"));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(invalid("longitude must be within -180..=180"));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle (haversine) distance to `other`, in metres.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let delta_lat = (other.latitude - self.latitude).to_radians();
        let delta_lon = (other.longitude - self.longitude).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().min(1.0).asin();

        EARTH_RADIUS_M * c
    }
}

/// A rectangular search region: a center plus a full span in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Region {
    pub center: Coordinate,
    /// Total north-south extent in degrees.
    pub latitude_delta: f64,
    /// Total east-west extent in degrees.
    pub longitude_delta: f64,
}

/// Edges of a [`Region`], clamped to valid coordinate ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

impl Region {
    /// A region spanning `span` degrees in both directions around `center`.
    pub fn square(center: Coordinate, span: f64) -> Self {
        Self {
            center,
            latitude_delta: span,
            longitude_delta: span,
        }
    }

    pub fn bounds(&self) -> Bounds {
        let half_lat = self.latitude_delta / 2.0;
        let half_lon = self.longitude_delta / 2.0;
        Bounds {
            south: (self.center.latitude - half_lat).max(-90.0),
            north: (self.center.latitude + half_lat).min(90.0),
            west: (self.center.longitude - half_lon).max(-180.0),
            east: (self.center.longitude + half_lon).min(180.0),
        }
    }

    /// Whether `point` lies inside the region (edges inclusive).
    pub fn contains(&self, point: &Coordinate) -> bool {
        let b = self.bounds();
        (b.south..=b.north).contains(&point.latitude) && (b.west..=b.east).contains(&point.longitude)
    }
}
