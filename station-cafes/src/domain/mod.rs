//! Core domain types shared by the index, resolver and café search.

mod coordinate;
mod place;
mod station;

pub use coordinate::{Bounds, Coordinate, InvalidCoordinate, Region};
pub use place::Place;
pub use station::StationName;
