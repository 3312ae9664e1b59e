//! Nominatim `/search` response types.

use std::collections::HashMap;

use serde::Deserialize;

use crate::domain::{Coordinate, Place};

/// One row of a `format=jsonv2` search response.
///
/// Nominatim encodes coordinates as decimal strings.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResultDto {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub name: Option<String>,
    pub display_name: String,
    #[serde(default)]
    pub extratags: Option<HashMap<String, String>>,
}

impl SearchResultDto {
    /// Convert to a [`Place`], or `None` if the coordinates are unusable.
    pub fn into_place(self) -> Option<Place> {
        let latitude = self.lat.trim().parse().ok()?;
        let longitude = self.lon.trim().parse().ok()?;
        let coordinate = Coordinate::new(latitude, longitude).ok()?;

        let name = match self.name {
            Some(name) if !name.trim().is_empty() => name,
            // display_name is "name, street, city, ..."; the head is the best label
            _ => self
                .display_name
                .split(',')
                .next()
                .unwrap_or_default()
                .trim()
                .to_string(),
        };

        let url = self.extratags.as_ref().and_then(|tags| {
            tags.get("website")
                .or_else(|| tags.get("contact:website"))
                .or_else(|| tags.get("url"))
                .cloned()
        });

        Some(Place {
            name,
            coordinate,
            url,
            address: Some(self.display_name),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_jsonv2_row() {
        let json = r#"[{
            "place_id": 1,
            "lat": "35.6580339",
            "lon": "139.7016358",
            "category": "railway",
            "type": "station",
            "name": "渋谷",
            "display_name": "渋谷, 道玄坂, 渋谷区, 東京都, 日本",
            "extratags": {"website": "https://www.jreast.co.jp/"}
        }]"#;

        let rows: Vec<SearchResultDto> = serde_json::from_str(json).unwrap();
        let place = rows.into_iter().next().unwrap().into_place().unwrap();

        assert_eq!(place.name, "渋谷");
        assert!((place.coordinate.latitude() - 35.6580339).abs() < 1e-9);
        assert_eq!(place.url.as_deref(), Some("https://www.jreast.co.jp/"));
        assert!(place.address.unwrap().starts_with("渋谷, 道玄坂"));
    }

    #[test]
    fn name_falls_back_to_display_name_head() {
        let dto = SearchResultDto {
            lat: "1.0".into(),
            lon: "2.0".into(),
            name: Some("".into()),
            display_name: "Blue Bottle, 3 Chome, Tokyo".into(),
            extratags: None,
        };
        assert_eq!(dto.into_place().unwrap().name, "Blue Bottle");
    }

    #[test]
    fn unparsable_coordinates_are_dropped() {
        let dto = SearchResultDto {
            lat: "north".into(),
            lon: "2.0".into(),
            name: None,
            display_name: "Somewhere".into(),
            extratags: None,
        };
        assert!(dto.into_place().is_none());

        let dto = SearchResultDto {
            lat: "95.0".into(),
            lon: "2.0".into(),
            name: None,
            display_name: "Somewhere".into(),
            extratags: None,
        };
        assert!(dto.into_place().is_none());
    }
}
