use super::cache_aside::{self, CacheAside, Lookup, ResolveError};
use crate::clients::{GeocodeClient, Provider};
use crate::db::{Store, StoreError};
use crate::models::Location;

/// Resolves free-text place names to stored Locations.
pub struct LocationService {
    store: Store,
    geocoder: GeocodeClient,
}

impl LocationService {
    #[must_use]
    pub const fn new(store: Store, geocoder: GeocodeClient) -> Self {
        Self { store, geocoder }
    }

    /// Returns the Location for `query`, geocoding it only the first time.
    pub async fn resolve(&self, query: &str) -> Result<Location, ResolveError> {
        cache_aside::resolve(self, query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ResolveError::NotFound(query.to_string()))
    }
}

#[async_trait::async_trait]
impl CacheAside for LocationService {
    type Key = str;
    type Entry = Location;

    const RESOURCE: &'static str = "location";

    async fn lookup(&self, query: &str) -> Result<Lookup<Location>, StoreError> {
        let stored = self.store.find_location(query).await?;
        Ok(Lookup::from_rows(stored.into_iter().collect()))
    }

    async fn fetch(&self, query: &str) -> Result<Vec<Location>, ResolveError> {
        Ok(self.geocoder.fetch(query).await?)
    }

    async fn persist(&self, _: &str, entries: &[Location]) -> Result<Vec<Location>, StoreError> {
        let mut stored = Vec::with_capacity(entries.len());
        for location in entries {
            stored.push(self.store.add_location(location).await?);
        }
        Ok(stored)
    }
}
