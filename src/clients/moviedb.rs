use super::{ClientError, Provider, endpoint};
use crate::models::Movie;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;

pub const MOVIEDB_API: &str = "https://api.themoviedb.org";

pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w200_and_h300_bestv2";

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    results: Vec<TmdbMovie>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovie {
    title: String,
    #[serde(default)]
    overview: String,
    #[serde(default)]
    vote_average: f64,
    #[serde(default)]
    vote_count: i64,
    poster_path: Option<String>,
    #[serde(default)]
    popularity: f64,
    release_date: Option<String>,
}

/// TMDB title search. Input is a city name.
#[derive(Clone)]
pub struct MovieDbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl MovieDbClient {
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
impl Provider for MovieDbClient {
    type Input = str;
    type Payload = SearchResponse;
    type Output = Movie;

    const NAME: &'static str = "TMDB";

    fn request(&self, city: &str) -> Result<RequestBuilder, ClientError> {
        if city.trim().is_empty() {
            return Err(ClientError::invalid_input(Self::NAME, "city name is empty"));
        }

        let mut url = endpoint(Self::NAME, &self.base_url, "/3/search/movie")?;
        url.query_pairs_mut()
            .append_pair("api_key", &self.api_key)
            .append_pair("query", city);

        Ok(self.client.get(url))
    }

    fn normalize(_: &str, payload: SearchResponse) -> Result<Vec<Movie>, ClientError> {
        Ok(payload
            .results
            .into_iter()
            .map(|m| Movie {
                title: m.title,
                overview: m.overview,
                average_votes: m.vote_average,
                total_votes: m.vote_count,
                image_url: m.poster_path.map(|p| format!("{POSTER_BASE_URL}{p}")),
                popularity: m.popularity,
                released_on: m.release_date.filter(|d| !d.is_empty()),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_normalize_builds_poster_url() {
        let payload: SearchResponse = serde_json::from_value(serde_json::json!({
            "results": [
                {
                    "title": "Sleepless in Seattle",
                    "overview": "A widower...",
                    "vote_average": 6.8,
                    "vote_count": 2100,
                    "poster_path": "/iLWsLVrfkFvOXOG9PbUAYg7AK3E.jpg",
                    "popularity": 12.5,
                    "release_date": "1993-06-24"
                },
                { "title": "No Poster", "poster_path": null, "release_date": "" }
            ]
        }))
        .unwrap();

        let movies = MovieDbClient::normalize("Seattle", payload).unwrap();
        assert_eq!(
            movies[0].image_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w200_and_h300_bestv2/iLWsLVrfkFvOXOG9PbUAYg7AK3E.jpg")
        );
        assert_eq!(movies[0].total_votes, 2100);
        assert_eq!(movies[0].released_on.as_deref(), Some("1993-06-24"));
        assert_eq!(movies[1].image_url, None);
        assert_eq!(movies[1].released_on, None);
    }

    #[test]
    fn test_blank_city_is_rejected_before_sending() {
        let client = MovieDbClient::new(Client::new(), MOVIEDB_API, "k");
        assert!(matches!(
            client.request("  "),
            Err(ClientError::InvalidInput { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_searches_by_city() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/3/search/movie"))
            .and(query_param("query", "Seattle"))
            .and(query_param("api_key", "tmdb-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "page": 1,
                "results": [{ "title": "Singles", "vote_average": 6.6, "vote_count": 300, "popularity": 5.0 }]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = MovieDbClient::new(Client::new(), mock_server.uri(), "tmdb-key");
        let movies = client.fetch("Seattle").await.unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].title, "Singles");
    }
}
