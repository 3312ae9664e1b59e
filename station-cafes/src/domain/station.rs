//! Station name normalization.

use std::fmt;

use serde::{Serialize, Serializer};

/// Suffix markers that may trail a station name.
///
/// Point-of-interest providers return "渋谷駅" or "Shibuya Station" while the
/// station/line table lists plain "渋谷" / "Shibuya".
const KANJI_SUFFIX: &str = "駅";
const ENGLISH_SUFFIX: &str = " station";

/// A normalized station name.
///
/// Surrounding whitespace and trailing station markers are removed, so
/// names from the line table and names from search results compare equal.
/// Normalizing an already-normalized name leaves it unchanged.
///
/// # Examples
///
/// ```
/// use station_cafes::domain::StationName;
///
/// assert_eq!(StationName::new("渋谷駅"), StationName::new("渋谷"));
/// assert_eq!(StationName::new("Shibuya Station").as_str(), "Shibuya");
/// assert_eq!(StationName::new("  新宿 ").as_str(), "新宿");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationName(String);

impl StationName {
    /// Normalize a raw station name.
    pub fn new(raw: &str) -> Self {
        Self(normalize(raw).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

fn normalize(raw: &str) -> &str {
    let mut name = raw.trim();
    while let Some(stripped) = strip_marker(name) {
        name = stripped;
    }
    name
}

/// `name` without its trailing station marker, if it has one.
fn strip_marker(name: &str) -> Option<&str> {
    if let Some(stripped) = name.strip_suffix(KANJI_SUFFIX) {
        return Some(stripped.trim_end());
    }

    let split = name.len().saturating_sub(ENGLISH_SUFFIX.len());
    if name.len() > ENGLISH_SUFFIX.len()
        && name.is_char_boundary(split)
        && name[split..].eq_ignore_ascii_case(ENGLISH_SUFFIX)
    {
        return Some(name[..split].trim_end());
    }

    None
}

impl From<&str> for StationName {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl AsRef<str> for StationName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationName({})", self.0)
    }
}

impl fmt::Display for StationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for StationName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_kanji_suffix() {
        assert_eq!(StationName::new("渋谷駅").as_str(), "渋谷");
        assert_eq!(StationName::new(" 渋谷駅 ").as_str(), "渋谷");
    }

    #[test]
    fn strips_english_suffix_case_insensitively() {
        assert_eq!(StationName::new("Shibuya Station").as_str(), "Shibuya");
        assert_eq!(StationName::new("Shibuya station").as_str(), "Shibuya");
        assert_eq!(StationName::new("Shibuya STATION").as_str(), "Shibuya");
    }

    #[test]
    fn leaves_plain_names_alone() {
        assert_eq!(StationName::new("渋谷").as_str(), "渋谷");
        assert_eq!(StationName::new("Stationery").as_str(), "Stationery");
        assert_eq!(StationName::new("Station").as_str(), "Station");
    }

    #[test]
    fn strips_repeated_markers() {
        assert_eq!(StationName::new("駅駅").as_str(), "");
        assert_eq!(StationName::new("Foo Station Station").as_str(), "Foo");
        assert_eq!(StationName::new("渋谷駅 Station").as_str(), "渋谷");
    }

    #[test]
    fn multibyte_before_english_suffix() {
        assert_eq!(StationName::new("東京 station").as_str(), "東京");
        // Suffix split would land inside a multibyte char.
        assert_eq!(StationName::new("東京駅前").as_str(), "東京駅前");
    }

    #[test]
    fn equality_and_hash_use_normalized_form() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(StationName::new("新宿駅"));
        assert!(set.contains(&StationName::new("新宿")));
        assert!(!set.contains(&StationName::new("新橋")));
    }

    #[test]
    fn display_and_debug() {
        let name = StationName::new("品川駅");
        assert_eq!(format!("{name}"), "品川");
        assert_eq!(format!("{name:?}"), "StationName(品川)");
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&StationName::new("Ueno Station")).unwrap();
        assert_eq!(json, r#""Ueno""#);
    }
}
