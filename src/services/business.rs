use super::cache_aside::{self, CacheAside, Lookup, ResolveError};
use crate::clients::{Provider, YelpClient};
use crate::db::{Store, StoreError};
use crate::models::{Business, Location};

/// Nearby businesses per Location.
pub struct BusinessService {
    store: Store,
    yelp: YelpClient,
}

impl BusinessService {
    #[must_use]
    pub const fn new(store: Store, yelp: YelpClient) -> Self {
        Self { store, yelp }
    }

    /// Only the stored Location's coordinates are used once its id is known.
    pub async fn resolve(&self, location: &Location) -> Result<Vec<Business>, ResolveError> {
        let owner = self.store.owning_location(location).await?;
        cache_aside::resolve(self, &owner).await
    }
}

#[async_trait::async_trait]
impl CacheAside for BusinessService {
    type Key = Location;
    type Entry = Business;

    const RESOURCE: &'static str = "business";

    async fn lookup(&self, location: &Location) -> Result<Lookup<Business>, StoreError> {
        let Some(id) = location.id else {
            return Ok(Lookup::Miss);
        };
        Ok(Lookup::from_rows(self.store.get_businesses(id).await?))
    }

    async fn fetch(&self, location: &Location) -> Result<Vec<Business>, ResolveError> {
        Ok(self.yelp.fetch(location).await?)
    }

    async fn persist(
        &self,
        location: &Location,
        entries: &[Business],
    ) -> Result<Vec<Business>, StoreError> {
        let id = location.id.ok_or(StoreError::MissingOwner)?;
        self.store.add_businesses(id, entries).await?;
        Ok(entries.to_vec())
    }
}
