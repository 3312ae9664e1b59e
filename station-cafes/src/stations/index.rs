//! Bidirectional station ↔ line index.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::domain::StationName;

use super::error::LoadError;

/// Station ↔ line lookup table.
///
/// Both directions are built together from the same rows, so every
/// `(station, line)` pair that was loaded is visible from either side.
/// Station names are stored and queried in normalized form (see
/// [`StationName`]). Lines keep their stations in source order.
#[derive(Debug, Clone, Default)]
pub struct StationLineIndex {
    lines_by_station: HashMap<StationName, Vec<String>>,
    stations_by_line: HashMap<String, Vec<String>>,
    /// Line names in first-seen order.
    line_order: Vec<String>,
}

impl StationLineIndex {
    /// An index that knows no stations or lines.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the table from a CSV file.
    ///
    /// The first row is a header. Each following row contributes its first
    /// two fields as `(station, line)`; extra columns are ignored and rows
    /// with fewer than two non-empty fields are skipped.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let index = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            stations = index.station_count(),
            lines = index.line_count(),
            "loaded station/line table"
        );
        Ok(index)
    }

    /// Load the table, falling back to an empty index if it cannot be read.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!("{e}; continuing with no station/line data");
            Self::empty()
        })
    }

    /// Build the index from any CSV source.
    pub fn from_reader(reader: impl Read) -> Result<Self, LoadError> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut index = Self::empty();
        for record in csv.records() {
            let record = record?;
            match (record.get(0), record.get(1)) {
                (Some(station), Some(line)) if !station.is_empty() && !line.is_empty() => {
                    index.insert(StationName::new(station), line);
                }
                _ => {
                    debug!(row = ?record.position().map(|p| p.line()), "skipping malformed row");
                }
            }
        }

        Ok(index)
    }

    fn insert(&mut self, station: StationName, line: &str) {
        if station.is_empty() {
            return;
        }

        let stations = self.stations_by_line.entry(line.to_string()).or_insert_with(|| {
            self.line_order.push(line.to_string());
            Vec::new()
        });
        stations.push(station.as_str().to_string());

        self.lines_by_station
            .entry(station)
            .or_default()
            .push(line.to_string());
    }

    /// Lines serving `station`, in source order. Empty if unknown.
    pub fn lines_for(&self, station: &str) -> &[String] {
        self.lines_by_station
            .get(&StationName::new(station))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Stations on `line`, in source order. Empty if unknown.
    pub fn stations_for(&self, line: &str) -> &[String] {
        self.stations_by_line
            .get(line.trim())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All line names, in the order they first appear in the source.
    pub fn lines(&self) -> &[String] {
        &self.line_order
    }

    /// Number of distinct stations.
    pub fn station_count(&self) -> usize {
        self.lines_by_station.len()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.stations_by_line.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines_by_station.is_empty()
    }
}
