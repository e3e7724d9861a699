use super::cache_aside::ResolveError;
use crate::clients::{MovieDbClient, Provider};
use crate::models::{Location, Movie};
use tracing::debug;

/// Movies whose titles match the Location's city. Always fetched live.
pub struct MovieService {
    moviedb: MovieDbClient,
}

impl MovieService {
    #[must_use]
    pub const fn new(moviedb: MovieDbClient) -> Self {
        Self { moviedb }
    }

    pub async fn search(&self, location: &Location) -> Result<Vec<Movie>, ResolveError> {
        let city = location.city();
        debug!(city, "Searching movies");
        Ok(self.moviedb.fetch(city).await?)
    }
}
