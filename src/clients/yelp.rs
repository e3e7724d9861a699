use super::{ClientError, Provider, endpoint};
use crate::models::{Business, Location};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;

pub const YELP_API: &str = "https://api.yelp.com";

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    businesses: Vec<YelpBusiness>,
}

#[derive(Debug, Deserialize)]
struct YelpBusiness {
    name: String,
    image_url: Option<String>,
    price: Option<String>,
    #[serde(default)]
    rating: f64,
    url: Option<String>,
}

/// Yelp Fusion business search around a coordinate.
#[derive(Clone)]
pub struct YelpClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl YelpClient {
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
impl Provider for YelpClient {
    type Input = Location;
    type Payload = SearchResponse;
    type Output = Business;

    const NAME: &'static str = "Yelp";

    fn request(&self, location: &Location) -> Result<RequestBuilder, ClientError> {
        let mut url = endpoint(Self::NAME, &self.base_url, "/v3/businesses/search")?;
        url.query_pairs_mut()
            .append_pair("latitude", &location.latitude.to_string())
            .append_pair("longitude", &location.longitude.to_string());

        Ok(self.client.get(url).bearer_auth(&self.api_key))
    }

    fn normalize(_: &Location, payload: SearchResponse) -> Result<Vec<Business>, ClientError> {
        Ok(payload
            .businesses
            .into_iter()
            .map(|b| Business {
                name: b.name,
                image_url: b.image_url.filter(|u| !u.is_empty()),
                price: b.price,
                rating: b.rating,
                url: b.url,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn seattle() -> Location {
        Location {
            id: Some(1),
            search_query: "seattle".to_string(),
            formatted_query: "Seattle, WA, USA".to_string(),
            latitude: 47.6,
            longitude: -122.3,
        }
    }

    #[test]
    fn test_normalize_tolerates_missing_price() {
        let payload: SearchResponse = serde_json::from_value(serde_json::json!({
            "businesses": [
                { "name": "Pike Place Chowder", "image_url": "https://img/1.jpg", "price": "$$", "rating": 4.5, "url": "https://yelp/1" },
                { "name": "Corner Cart", "image_url": "", "rating": 3.0, "url": "https://yelp/2" }
            ]
        }))
        .unwrap();

        let businesses = YelpClient::normalize(&seattle(), payload).unwrap();
        assert_eq!(businesses.len(), 2);
        assert_eq!(businesses[0].price.as_deref(), Some("$$"));
        assert_eq!(businesses[1].price, None);
        assert_eq!(businesses[1].image_url, None);
    }

    #[tokio::test]
    async fn test_fetch_uses_bearer_token_and_coordinates() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v3/businesses/search"))
            .and(query_param("latitude", "47.6"))
            .and(query_param("longitude", "-122.3"))
            .and(header("Authorization", "Bearer yelp-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "businesses": []
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = YelpClient::new(Client::new(), mock_server.uri(), "yelp-key");
        let businesses = client.fetch(&seattle()).await.unwrap();
        assert!(businesses.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_unauthorized_is_status_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad token"))
            .mount(&mock_server)
            .await;

        let client = YelpClient::new(Client::new(), mock_server.uri(), "wrong");
        match client.fetch(&seattle()).await.unwrap_err() {
            ClientError::Status { status, body, .. } => {
                assert_eq!(status, reqwest::StatusCode::UNAUTHORIZED);
                assert_eq!(body, "bad token");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
