use super::cache_aside::{self, CacheAside, Lookup, ResolveError};
use crate::clients::{ForecastClient, Provider};
use crate::db::{Store, StoreError};
use crate::models::{Location, Weather};

/// Daily forecasts per Location, fetched once and then served from the store.
pub struct WeatherService {
    store: Store,
    forecast: ForecastClient,
}

impl WeatherService {
    #[must_use]
    pub const fn new(store: Store, forecast: ForecastClient) -> Self {
        Self { store, forecast }
    }

    /// Only the stored Location's coordinates are used once its id is known.
    pub async fn resolve(&self, location: &Location) -> Result<Vec<Weather>, ResolveError> {
        let owner = self.store.owning_location(location).await?;
        cache_aside::resolve(self, &owner).await
    }
}

#[async_trait::async_trait]
impl CacheAside for WeatherService {
    type Key = Location;
    type Entry = Weather;

    const RESOURCE: &'static str = "weather";

    async fn lookup(&self, location: &Location) -> Result<Lookup<Weather>, StoreError> {
        // Nothing can be stored against a Location that was never stored itself.
        let Some(id) = location.id else {
            return Ok(Lookup::Miss);
        };
        Ok(Lookup::from_rows(self.store.get_weather(id).await?))
    }

    async fn fetch(&self, location: &Location) -> Result<Vec<Weather>, ResolveError> {
        Ok(self.forecast.fetch(location).await?)
    }

    async fn persist(
        &self,
        location: &Location,
        entries: &[Weather],
    ) -> Result<Vec<Weather>, StoreError> {
        let id = location.id.ok_or(StoreError::MissingOwner)?;
        self.store.add_weather(id, entries).await?;
        Ok(entries.to_vec())
    }
}
