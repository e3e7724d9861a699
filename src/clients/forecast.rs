use super::{ClientError, Provider, endpoint};
use crate::models::{Location, Weather};
use chrono::DateTime;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;

pub const FORECAST_API: &str = "https://api.darksky.net";

#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    daily: Daily,
}

#[derive(Debug, Deserialize)]
struct Daily {
    #[serde(default)]
    data: Vec<DailyEntry>,
}

#[derive(Debug, Deserialize)]
struct DailyEntry {
    summary: String,
    /// Unix seconds at the start of the day.
    time: i64,
}

/// Dark Sky style forecast API, one entry per forecast day.
#[derive(Clone)]
pub struct ForecastClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ForecastClient {
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
impl Provider for ForecastClient {
    type Input = Location;
    type Payload = ForecastResponse;
    type Output = Weather;

    const NAME: &'static str = "Forecast";

    fn request(&self, location: &Location) -> Result<RequestBuilder, ClientError> {
        let mut url = endpoint(Self::NAME, &self.base_url, "/forecast")?;
        url.path_segments_mut()
            .map_err(|()| ClientError::invalid_input(Self::NAME, "base URL cannot have a path"))?
            .push(&self.api_key)
            .push(&format!("{},{}", location.latitude, location.longitude));

        Ok(self.client.get(url))
    }

    fn normalize(_: &Location, payload: ForecastResponse) -> Result<Vec<Weather>, ClientError> {
        payload
            .daily
            .data
            .into_iter()
            .map(|day| {
                let time = DateTime::from_timestamp(day.time, 0)
                    .ok_or_else(|| {
                        ClientError::decode(Self::NAME, format!("timestamp {} out of range", day.time))
                    })?
                    .date_naive();

                Ok(Weather {
                    forecast: day.summary,
                    time,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn seattle() -> Location {
        Location {
            id: Some(1),
            search_query: "seattle".to_string(),
            formatted_query: "Seattle, WA, USA".to_string(),
            latitude: 47.6062,
            longitude: -122.3321,
        }
    }

    #[test]
    fn test_normalize_keeps_order_and_truncates_to_date() {
        let payload: ForecastResponse = serde_json::from_value(serde_json::json!({
            "daily": { "data": [
                { "summary": "Rain", "time": 1_792_108_800 },
                { "summary": "Clouds", "time": 1_792_195_200 + 3600 },
                { "summary": "Sun", "time": 1_792_281_600 + 86_399 }
            ]}
        }))
        .unwrap();

        let entries = ForecastClient::normalize(&seattle(), payload).unwrap();
        let summaries: Vec<_> = entries.iter().map(|w| w.forecast.as_str()).collect();
        assert_eq!(summaries, ["Rain", "Clouds", "Sun"]);
        assert_eq!(entries[0].time, NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
        assert_eq!(entries[1].time, NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());
        assert_eq!(entries[2].time, NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
    }

    #[test]
    fn test_empty_daily_data_is_empty() {
        let payload: ForecastResponse =
            serde_json::from_value(serde_json::json!({ "daily": { "data": [] } })).unwrap();
        assert!(ForecastClient::normalize(&seattle(), payload).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_puts_key_and_coordinates_in_path() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast/wx-key/47.6062,-122.3321"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "daily": { "data": [{ "summary": "Drizzle", "time": 1_792_108_800 }] }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ForecastClient::new(Client::new(), mock_server.uri(), "wx-key");
        let entries = client.fetch(&seattle()).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].forecast, "Drizzle");
    }

    #[tokio::test]
    async fn test_fetch_missing_daily_block_is_decode_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "currently": { "summary": "Clear" }
            })))
            .mount(&mock_server)
            .await;

        let client = ForecastClient::new(Client::new(), mock_server.uri(), "wx-key");
        let err = client.fetch(&seattle()).await.unwrap_err();
        assert!(matches!(err, ClientError::Decode { .. }));
    }
}
