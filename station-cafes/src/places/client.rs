//! Nominatim point-of-interest search client.

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::debug;

use crate::domain::{Place, Region};

use super::error::PlacesError;
use super::types::SearchResultDto;
use super::{PlaceQuery, PlaceSearch};

/// Default base URL for the public OpenStreetMap Nominatim instance.
const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Nominatim's usage policy requires an identifying user agent.
const DEFAULT_USER_AGENT: &str = concat!("station-cafes/", env!("CARGO_PKG_VERSION"));

/// Configuration for the Nominatim client.
#[derive(Debug, Clone)]
pub struct NominatimConfig {
    /// Base URL for the API
    pub base_url: String,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Maximum results per query
    pub limit: u8,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl NominatimConfig {
    /// Set a custom base URL (self-hosted instance or testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_limit(mut self, limit: u8) -> Self {
        self.limit = limit;
        self
    }
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            limit: 20,
            timeout_secs: 30,
        }
    }
}

/// Client for a Nominatim-compatible `/search` endpoint.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: reqwest::Client,
    base_url: String,
    limit: u8,
}

impl NominatimClient {
    /// Create a new client.
    pub fn new(config: NominatimConfig) -> Result<Self, PlacesError> {
        let mut headers = HeaderMap::new();
        let user_agent = HeaderValue::from_str(&config.user_agent).map_err(|_| {
            PlacesError::NotConfigured(format!("invalid user agent: {}", config.user_agent))
        })?;
        headers.insert(USER_AGENT, user_agent);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            limit: config.limit,
        })
    }
}

/// Query-string parameters for a search.
fn query_params(query: &PlaceQuery, limit: u8) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("q", query.text.clone()),
        ("format", "jsonv2".to_string()),
        ("limit", limit.to_string()),
        ("extratags", "1".to_string()),
    ];
    if let Some(region) = &query.region {
        params.push(("viewbox", viewbox(region)));
        params.push(("bounded", "1".to_string()));
    }
    params
}

/// Nominatim viewbox: `left,top,right,bottom` (lon, lat, lon, lat).
fn viewbox(region: &Region) -> String {
    let b = region.bounds();
    format!("{},{},{},{}", b.west, b.north, b.east, b.south)
}

impl PlaceSearch for NominatimClient {
    async fn search(&self, query: &PlaceQuery) -> Result<Vec<Place>, PlacesError> {
        let url = format!("{}/search", self.base_url);
        debug!(q = %query.text, bounded = query.region.is_some(), "nominatim search");

        let response = self
            .http
            .get(&url)
            .query(&query_params(query, self.limit))
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(PlacesError::Unauthorized);
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PlacesError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlacesError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let rows: Vec<SearchResultDto> =
            serde_json::from_str(&body).map_err(|e| PlacesError::Json {
                message: e.to_string(),
            })?;

        Ok(rows.into_iter().filter_map(SearchResultDto::into_place).collect())
    }
}
