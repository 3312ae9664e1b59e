//! Application state for the web layer.

use std::sync::Arc;

use crate::cafes::CafeSearchService;
use crate::directions::{DirectionsService, OsrmClient};
use crate::places::PlaceProvider;
use crate::resolver::ResolverHandle;
use crate::stations::StationLineIndex;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Handle to the nearest-station resolver task
    pub resolver: ResolverHandle,

    /// Station ↔ line lookup
    pub index: Arc<StationLineIndex>,

    /// Cached café search
    pub cafes: Arc<CafeSearchService<PlaceProvider>>,

    /// Driving directions from the last known location
    pub directions: Arc<DirectionsService<OsrmClient>>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        resolver: ResolverHandle,
        index: Arc<StationLineIndex>,
        cafes: CafeSearchService<PlaceProvider>,
        directions: DirectionsService<OsrmClient>,
    ) -> Self {
        Self {
            resolver,
            index,
            cafes: Arc::new(cafes),
            directions: Arc::new(directions),
        }
    }
}
