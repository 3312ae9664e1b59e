//! Web layer for the station café finder.
//!
//! Provides a JSON API for feeding location events to the resolver and for
//! browsing lines, stations, cafés and directions.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
