//! Café search near a station, with cached results.
//!
//! Repeated selections of the same station within the expiration window are
//! answered from the cache without calling the provider again.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::{CacheConfig, ExpiringSearchCache};
use crate::domain::{Place, StationName};
use crate::places::{PlaceQuery, PlaceSearch};

/// Cached café list for one station.
pub type CafeList = Arc<Vec<Place>>;

/// Natural-language query for cafés near `station`.
pub fn cafe_query(station: &StationName) -> String {
    format!("{station} station nearby cafés")
}

/// Place search wrapper that caches café results per station.
pub struct CafeSearchService<P> {
    provider: P,
    cache: ExpiringSearchCache<CafeList>,
}

impl<P: PlaceSearch> CafeSearchService<P> {
    /// Create a new service.
    pub fn new(provider: P, cache_config: &CacheConfig) -> Self {
        Self {
            provider,
            cache: ExpiringSearchCache::new(cache_config),
        }
    }

    /// Cafés near `station`.
    ///
    /// Provider failures are logged and reported as an empty list; nothing is
    /// cached in that case, so the next call tries the provider again.
    pub async fn search_cafes(&self, station: &str) -> CafeList {
        let station = StationName::new(station);

        if let Some(cached) = self.cache.lookup(station.as_str()).await {
            debug!(%station, "café cache hit");
            return cached;
        }

        let query = PlaceQuery::new(cafe_query(&station));
        match self.provider.search(&query).await {
            Ok(places) => {
                debug!(%station, count = places.len(), "café search");
                let places = Arc::new(places);
                self.cache
                    .store(station.into_string(), Arc::clone(&places))
                    .await;
                places
            }
            Err(e) => {
                warn!(%station, "café search failed: {e}");
                Arc::new(Vec::new())
            }
        }
    }

    /// Access the underlying cache.
    pub fn cache(&self) -> &ExpiringSearchCache<CafeList> {
        &self.cache
    }
}
