//! Nearest-station resolution.
//!
//! Finds the station closest to the user by searching a small region around
//! them and doubling the region until a station within range turns up.

mod config;
mod machine;
mod task;

pub use config::ResolverConfig;
pub use machine::{NO_STATION_FOUND, NearestStationResolver, ResolverState, Transition};
pub use task::{NearestStation, ResolverClosed, ResolverHandle, ResolverSnapshot, spawn};
