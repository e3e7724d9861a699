use serde::{Deserialize, Serialize};
use std::fmt;

/// A geocoded place, keyed by the free-text query that produced it.
///
/// `id` is the surrogate key assigned when the row is first stored. It is
/// absent on a Location that was fetched but could not be persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    pub search_query: String,
    pub formatted_query: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// City portion of the formatted query: everything before the first comma.
    #[must_use]
    pub fn city(&self) -> &str {
        self.formatted_query
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "{} (#{id})", self.search_query),
            None => write!(f, "{}", self.search_query),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(formatted: &str) -> Location {
        Location {
            id: None,
            search_query: "q".to_string(),
            formatted_query: formatted.to_string(),
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    #[test]
    fn test_city_takes_text_before_first_comma() {
        assert_eq!(location("Seattle, WA, USA").city(), "Seattle");
        assert_eq!(location("Lynnwood").city(), "Lynnwood");
        assert_eq!(location("").city(), "");
    }

    #[test]
    fn test_id_is_optional_on_the_wire() {
        let parsed: Location = serde_json::from_str(
            r#"{"search_query":"seattle","formatted_query":"Seattle, WA, USA","latitude":47.6,"longitude":-122.3}"#,
        )
        .unwrap();
        assert_eq!(parsed.id, None);

        let json = serde_json::to_value(&parsed).unwrap();
        assert!(json.get("id").is_none());
    }
}
