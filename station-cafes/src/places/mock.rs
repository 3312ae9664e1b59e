//! Mock place search for running without network access.
//!
//! Loads canned results from a JSON fixture and serves them as if they were
//! live provider responses.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::domain::Place;

use super::error::PlacesError;
use super::{PlaceQuery, PlaceSearch};

/// Fixture file layout: query text → results in ranking order.
#[derive(Debug, Deserialize)]
struct Fixture {
    queries: HashMap<String, Vec<Place>>,
}

/// Place search that serves results from a fixture.
///
/// Queries are matched on their exact text. When a query carries a region,
/// only places inside it are returned, in fixture order.
#[derive(Debug, Clone, Default)]
pub struct MockPlaceSearch {
    queries: Arc<HashMap<String, Vec<Place>>>,
}

impl MockPlaceSearch {
    /// Load a fixture file.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, PlacesError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            PlacesError::NotConfigured(format!("failed to read {}: {e}", path.display()))
        })?;

        let fixture: Fixture = serde_json::from_str(&json).map_err(|e| PlacesError::Json {
            message: format!("failed to parse {}: {e}", path.display()),
        })?;

        Ok(Self {
            queries: Arc::new(fixture.queries),
        })
    }

    /// Build a mock from in-memory query results.
    pub fn from_queries(queries: HashMap<String, Vec<Place>>) -> Self {
        Self {
            queries: Arc::new(queries),
        }
    }

    /// Query texts the fixture can answer.
    pub fn known_queries(&self) -> Vec<&str> {
        self.queries.keys().map(String::as_str).collect()
    }
}

impl PlaceSearch for MockPlaceSearch {
    async fn search(&self, query: &PlaceQuery) -> Result<Vec<Place>, PlacesError> {
        let Some(places) = self.queries.get(&query.text) else {
            return Ok(Vec::new());
        };

        Ok(places
            .iter()
            .filter(|p| query.region.is_none_or(|r| r.contains(&p.coordinate)))
            .cloned()
            .collect())
    }
}
