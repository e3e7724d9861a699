//! Outbound clients for the third-party APIs.
//!
//! Every provider implements [`Provider`]: it knows how to build its request
//! and how to normalize the decoded payload. Sending, status checks and
//! decoding are shared so failures are classified the same way everywhere.

pub mod forecast;
pub mod geocode;
pub mod moviedb;
pub mod yelp;

pub use forecast::ForecastClient;
pub use geocode::GeocodeClient;
pub use moviedb::MovieDbClient;
pub use yelp::YelpClient;

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{service} request failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned {status}: {body}")]
    Status {
        service: &'static str,
        status: StatusCode,
        body: String,
    },

    /// The API answered 200 but reported a failure in the payload.
    #[error("{service} rejected the request: {message}")]
    Rejected {
        service: &'static str,
        message: String,
    },

    #[error("{service} response could not be decoded: {message}")]
    Decode {
        service: &'static str,
        message: String,
    },

    #[error("{service} found no results for '{query}'")]
    NoResults { service: &'static str, query: String },

    #[error("invalid {service} request: {message}")]
    InvalidInput {
        service: &'static str,
        message: String,
    },
}

impl ClientError {
    pub fn decode(service: &'static str, message: impl Into<String>) -> Self {
        Self::Decode {
            service,
            message: message.into(),
        }
    }

    pub fn invalid_input(service: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            service,
            message: message.into(),
        }
    }
}

/// One third-party API: how to ask it, and how to read its answer.
#[async_trait::async_trait]
pub trait Provider: Send + Sync {
    type Input: ?Sized + Sync;
    type Payload: DeserializeOwned;
    type Output: Send;

    const NAME: &'static str;

    fn request(&self, input: &Self::Input) -> Result<RequestBuilder, ClientError>;

    fn normalize(
        input: &Self::Input,
        payload: Self::Payload,
    ) -> Result<Vec<Self::Output>, ClientError>;

    async fn fetch(&self, input: &Self::Input) -> Result<Vec<Self::Output>, ClientError> {
        let request = self.request(input)?;

        let response = request.send().await.map_err(|source| {
            record_outcome(Self::NAME, "transport_error");
            ClientError::Transport {
                service: Self::NAME,
                source,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            record_outcome(Self::NAME, "status_error");
            let body = response.text().await.unwrap_or_default();
            warn!(provider = Self::NAME, %status, "Upstream returned an error status");
            return Err(ClientError::Status {
                service: Self::NAME,
                status,
                body,
            });
        }

        let body = response.text().await.map_err(|source| {
            record_outcome(Self::NAME, "transport_error");
            ClientError::Transport {
                service: Self::NAME,
                source,
            }
        })?;

        let payload: Self::Payload = serde_json::from_str(&body).map_err(|e| {
            record_outcome(Self::NAME, "decode_error");
            ClientError::decode(Self::NAME, e.to_string())
        })?;

        let entries = Self::normalize(input, payload).inspect_err(|e| {
            let outcome = match e {
                ClientError::NoResults { .. } => "no_results",
                ClientError::Rejected { .. } => "rejected",
                _ => "decode_error",
            };
            record_outcome(Self::NAME, outcome);
        })?;
        record_outcome(Self::NAME, "ok");
        debug!(provider = Self::NAME, count = entries.len(), "Fetched entries");
        Ok(entries)
    }
}

fn record_outcome(provider: &'static str, outcome: &'static str) {
    metrics::counter!("upstream_requests_total", "provider" => provider, "outcome" => outcome)
        .increment(1);
}

/// Joins a configured base URL and an API path.
pub(crate) fn endpoint(
    service: &'static str,
    base_url: &str,
    path: &str,
) -> Result<url::Url, ClientError> {
    let raw = format!("{}{}", base_url.trim_end_matches('/'), path);
    url::Url::parse(&raw)
        .map_err(|e| ClientError::invalid_input(service, format!("bad URL '{raw}': {e}")))
}
