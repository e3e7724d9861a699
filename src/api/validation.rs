use super::ApiError;
use crate::models::Location;

pub fn validate_search_query(query: Option<&str>) -> Result<&str, ApiError> {
    let trimmed = query.unwrap_or_default().trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Search query cannot be empty"));
    }
    Ok(trimmed)
}

/// Decodes the JSON Location carried in the `data` parameter.
pub fn parse_location(data: Option<&str>) -> Result<Location, ApiError> {
    let raw = data.ok_or_else(|| ApiError::validation("Missing `data` parameter"))?;

    let location: Location = serde_json::from_str(raw)
        .map_err(|e| ApiError::validation(format!("Invalid location payload: {e}")))?;

    if !(-90.0..=90.0).contains(&location.latitude)
        || !(-180.0..=180.0).contains(&location.longitude)
    {
        return Err(ApiError::validation(format!(
            "Coordinates out of range: {}, {}",
            location.latitude, location.longitude
        )));
    }

    Ok(location)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query(Some("Seattle, WA")).unwrap(), "Seattle, WA");
        assert_eq!(validate_search_query(Some("  trimmed  ")).unwrap(), "trimmed");
        assert!(validate_search_query(Some("")).is_err());
        assert!(validate_search_query(Some("   ")).is_err());
        assert!(validate_search_query(None).is_err());
    }

    #[test]
    fn test_parse_location() {
        let location = parse_location(Some(
            r#"{"id":3,"search_query":"seattle","formatted_query":"Seattle, WA, USA","latitude":47.6,"longitude":-122.3}"#,
        ))
        .unwrap();
        assert_eq!(location.id, Some(3));
        assert_eq!(location.city(), "Seattle");

        assert!(parse_location(None).is_err());
        assert!(parse_location(Some("seattle")).is_err());
        assert!(parse_location(Some(
            r#"{"search_query":"x","formatted_query":"x","latitude":91.0,"longitude":0.0}"#
        ))
        .is_err());
    }
}
