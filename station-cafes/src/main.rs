use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use station_cafes::cache::CacheConfig;
use station_cafes::cafes::CafeSearchService;
use station_cafes::directions::{DirectionsService, OsrmClient, OsrmConfig};
use station_cafes::places::{MockPlaceSearch, NominatimClient, NominatimConfig, PlaceProvider};
use station_cafes::resolver::{self, ResolverConfig};
use station_cafes::stations::StationLineIndex;
use station_cafes::web::{AppState, create_router};

/// Default location of the station/line table.
const DEFAULT_STATION_LINE_CSV: &str = "data/station_line.csv";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
        .parse()
        .expect("BIND_ADDR must be a socket address");

    // Station/line table (an unreadable file leaves the index empty)
    let csv_path = std::env::var("STATION_LINE_CSV")
        .unwrap_or_else(|_| DEFAULT_STATION_LINE_CSV.to_string());
    let index = Arc::new(StationLineIndex::load_or_empty(&csv_path));

    // Place search: fixture file when configured, Nominatim otherwise
    let places = match std::env::var("PLACES_MOCK_FILE") {
        Ok(path) => {
            let mock = MockPlaceSearch::new(&path).expect("Failed to load mock places");
            info!(%path, queries = mock.known_queries().len(), "using mock place search");
            PlaceProvider::Mock(mock)
        }
        Err(_) => {
            let mut config = NominatimConfig::default();
            if let Ok(url) = std::env::var("NOMINATIM_URL") {
                config = config.with_base_url(url);
            }
            if let Ok(agent) = std::env::var("HTTP_USER_AGENT") {
                config = config.with_user_agent(agent);
            }
            PlaceProvider::Nominatim(
                NominatimClient::new(config).expect("Failed to create Nominatim client"),
            )
        }
    };

    let mut osrm_config = OsrmConfig::default();
    if let Ok(url) = std::env::var("OSRM_URL") {
        osrm_config = osrm_config.with_base_url(url);
    }
    let osrm = OsrmClient::new(osrm_config).expect("Failed to create OSRM client");

    let mut cache_config = CacheConfig::default();
    if let Ok(secs) = std::env::var("CAFE_CACHE_TTL_SECS") {
        match secs.parse() {
            Ok(secs) => cache_config = cache_config.with_expiration(Duration::from_secs(secs)),
            Err(e) => warn!("ignoring CAFE_CACHE_TTL_SECS={secs}: {e}"),
        }
    }

    let resolver = resolver::spawn(
        Arc::new(places.clone()),
        Arc::clone(&index),
        ResolverConfig::default(),
    );
    let cafes = CafeSearchService::new(places, &cache_config);
    let directions = DirectionsService::new(osrm);

    let state = AppState::new(resolver, index, cafes, directions);
    let app = create_router(state);

    info!("Station café finder listening on http://{addr}");
    info!("  GET  /health                   - Health check");
    info!("  POST /location                 - Report a location event");
    info!("  GET  /nearest                  - Nearest station and its lines");
    info!("  GET  /lines                    - All lines");
    info!("  GET  /lines/:line/stations     - Stations on a line");
    info!("  GET  /stations/:station/lines  - Lines at a station");
    info!("  GET  /stations/:station/cafes  - Cafés near a station");
    info!("  POST /directions               - Route to a place");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
