//! Nearest-station and café finder server.
//!
//! Takes geolocation events, resolves the nearest railway station by
//! searching outward in widening regions, looks up the lines serving it, and
//! answers café searches near a station from an expiring cache.

pub mod cache;
pub mod cafes;
pub mod directions;
pub mod domain;
pub mod location;
pub mod places;
pub mod resolver;
pub mod stations;
pub mod web;
