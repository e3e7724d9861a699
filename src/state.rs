use std::sync::Arc;

use crate::clients::{ForecastClient, GeocodeClient, MovieDbClient, YelpClient};
use crate::config::Config;
use crate::db::Store;
use crate::services::{BusinessService, LocationService, MovieService, WeatherService};

/// One pooled client shared by every provider.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent(concat!("CityExplorer/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub locations: Arc<LocationService>,

    pub weather: Arc<WeatherService>,

    pub businesses: Arc<BusinessService>,

    pub movies: Arc<MovieService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_url,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Self::with_store(config, store)
    }

    /// Wires services around an already connected store.
    pub fn with_store(config: Config, store: Store) -> anyhow::Result<Self> {
        let providers = &config.providers;
        let http_client = build_shared_http_client(providers.request_timeout_seconds)?;

        let geocoder = GeocodeClient::new(
            http_client.clone(),
            &providers.geocode.base_url,
            &providers.geocode.api_key,
        );
        let forecast = ForecastClient::new(
            http_client.clone(),
            &providers.weather.base_url,
            &providers.weather.api_key,
        );
        let yelp = YelpClient::new(
            http_client.clone(),
            &providers.yelp.base_url,
            &providers.yelp.api_key,
        );
        let moviedb = MovieDbClient::new(
            http_client,
            &providers.moviedb.base_url,
            &providers.moviedb.api_key,
        );

        Ok(Self {
            locations: Arc::new(LocationService::new(store.clone(), geocoder)),
            weather: Arc::new(WeatherService::new(store.clone(), forecast)),
            businesses: Arc::new(BusinessService::new(store.clone(), yelp)),
            movies: Arc::new(MovieService::new(moviedb)),
            store,
            config: Arc::new(config),
        })
    }
}
