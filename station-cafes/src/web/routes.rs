//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::{error, warn};

use crate::domain::{Coordinate, InvalidCoordinate, StationName};
use crate::location::LocationEvent;
use crate::resolver::{ResolverClosed, ResolverSnapshot};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/location", post(post_location))
        .route("/nearest", get(nearest))
        .route("/lines", get(all_lines))
        .route("/lines/:line/stations", get(line_stations))
        .route("/stations/:station/lines", get(station_lines))
        .route("/stations/:station/cafes", get(station_cafes))
        .route("/directions", post(directions))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Feed one geolocation event to the resolver.
async fn post_location(
    State(state): State<AppState>,
    Json(event): Json<LocationEvent>,
) -> Result<StatusCode, AppError> {
    state.resolver.send(event).await?;
    Ok(StatusCode::ACCEPTED)
}

/// Current resolver state.
async fn nearest(State(state): State<AppState>) -> Json<ResolverSnapshot> {
    Json(state.resolver.snapshot())
}

async fn all_lines(State(state): State<AppState>) -> Json<LinesResponse> {
    Json(LinesResponse {
        lines: state.index.lines().to_vec(),
    })
}

/// Stations on a line. Unknown lines have no stations.
async fn line_stations(
    State(state): State<AppState>,
    Path(line): Path<String>,
) -> Json<LineStationsResponse> {
    let stations = state.index.stations_for(&line).to_vec();
    Json(LineStationsResponse { line, stations })
}

/// Lines serving a station. Unknown stations have no lines.
async fn station_lines(
    State(state): State<AppState>,
    Path(station): Path<String>,
) -> Result<Json<StationLinesResponse>, AppError> {
    let station = non_empty_station(&station)?;
    let lines = state.index.lines_for(station.as_str()).to_vec();
    Ok(Json(StationLinesResponse {
        station: station.into_string(),
        lines,
    }))
}

/// Cafés near a station.
async fn station_cafes(
    State(state): State<AppState>,
    Path(station): Path<String>,
) -> Result<Json<CafesResponse>, AppError> {
    let station = non_empty_station(&station)?;
    let cafes = state.cafes.search_cafes(station.as_str()).await;
    Ok(Json(CafesResponse {
        station: station.into_string(),
        cafes: cafes.as_ref().clone(),
    }))
}

/// Driving route from the last known location to a chosen place.
async fn directions(
    State(state): State<AppState>,
    Json(req): Json<DirectionsRequest>,
) -> Result<Json<DirectionsResponse>, AppError> {
    let destination = Coordinate::new(req.latitude, req.longitude)?;
    let route = state
        .directions
        .route_to(destination, state.resolver.last_location())
        .await;
    Ok(Json(DirectionsResponse { route }))
}

fn non_empty_station(raw: &str) -> Result<StationName, AppError> {
    let station = StationName::new(raw);
    if station.is_empty() {
        return Err(AppError::BadRequest {
            message: format!("Invalid station name: {raw:?}"),
        });
    }
    Ok(station)
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl From<InvalidCoordinate> for AppError {
    fn from(e: InvalidCoordinate) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<ResolverClosed> for AppError {
    fn from(e: ResolverClosed) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, "{message}");
        } else {
            warn!(%status, "{message}");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
