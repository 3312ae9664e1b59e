//! Point-of-interest search providers.
//!
//! [`PlaceSearch`] is the seam between the resolver / café search and the
//! outside world. [`NominatimClient`] talks to a Nominatim-compatible HTTP
//! API; [`MockPlaceSearch`] answers from a JSON fixture for offline use.

mod client;
mod error;
mod mock;
mod types;

use std::future::Future;

use crate::domain::{Place, Region};

pub use client::{NominatimClient, NominatimConfig};
pub use error::PlacesError;
pub use mock::MockPlaceSearch;

/// A free-text place query, optionally bounded to a region.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceQuery {
    pub text: String,
    pub region: Option<Region>,
}

impl PlaceQuery {
    /// An unbounded query.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            region: None,
        }
    }

    /// Restrict results to `region`.
    pub fn within(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }
}

/// A point-of-interest search provider.
///
/// Results are returned in the provider's ranking order.
pub trait PlaceSearch: Send + Sync {
    fn search(
        &self,
        query: &PlaceQuery,
    ) -> impl Future<Output = Result<Vec<Place>, PlacesError>> + Send;
}

/// Provider selected at startup.
#[derive(Debug, Clone)]
pub enum PlaceProvider {
    Nominatim(NominatimClient),
    Mock(MockPlaceSearch),
}

impl PlaceSearch for PlaceProvider {
    async fn search(&self, query: &PlaceQuery) -> Result<Vec<Place>, PlacesError> {
        match self {
            PlaceProvider::Nominatim(client) => client.search(query).await,
            PlaceProvider::Mock(mock) => mock.search(query).await,
        }
    }
}
