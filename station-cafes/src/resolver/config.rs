//! Nearest-station search configuration.

/// Tuning for the radius-expanding nearest-station search.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Span of the first search region, in degrees.
    pub initial_radius: f64,

    /// Largest span a search may use, in degrees.
    /// A retry whose doubled span would exceed this ends the search.
    pub max_radius: f64,

    /// Candidates farther than this from the user (metres) are rejected.
    pub max_distance_m: f64,

    /// Point-of-interest query used to find stations.
    pub query: String,
}

impl ResolverConfig {
    pub fn new(initial_radius: f64, max_radius: f64, max_distance_m: f64) -> Self {
        Self {
            initial_radius,
            max_radius,
            max_distance_m,
            ..Self::default()
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            initial_radius: 0.0005, // ~50 m
            max_radius: 0.1,
            max_distance_m: 5000.0,
            query: "station".to_string(),
        }
    }
}
