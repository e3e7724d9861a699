use super::{ClientError, Provider, endpoint};
use crate::models::Location;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;

pub const GEOCODE_API: &str = "https://maps.googleapis.com";

#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: String,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// Google Geocoding API: free text in, the best matching place out.
#[derive(Clone)]
pub struct GeocodeClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GeocodeClient {
    #[must_use]
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait::async_trait]
impl Provider for GeocodeClient {
    type Input = str;
    type Payload = GeocodeResponse;
    type Output = Location;

    const NAME: &'static str = "Geocoding";

    fn request(&self, query: &str) -> Result<RequestBuilder, ClientError> {
        let mut url = endpoint(Self::NAME, &self.base_url, "/maps/api/geocode/json")?;
        url.query_pairs_mut()
            .append_pair("address", query)
            .append_pair("key", &self.api_key);

        Ok(self.client.get(url))
    }

    fn normalize(query: &str, payload: GeocodeResponse) -> Result<Vec<Location>, ClientError> {
        // ZERO_RESULTS is a plain miss; any other non-OK status is a failure.
        match payload.status.as_deref() {
            None | Some("OK" | "ZERO_RESULTS") => {}
            Some(status) => {
                return Err(ClientError::Rejected {
                    service: Self::NAME,
                    message: payload
                        .error_message
                        .map_or_else(|| status.to_string(), |m| format!("{status}: {m}")),
                });
            }
        }

        let first = payload
            .results
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::NoResults {
                service: Self::NAME,
                query: query.to_string(),
            })?;

        Ok(vec![Location {
            id: None,
            search_query: query.to_string(),
            formatted_query: first.formatted_address,
            latitude: first.geometry.location.lat,
            longitude: first.geometry.location.lng,
        }])
    }
}
