use crate::models::{Business, Location, Weather};
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

pub mod migrator;
pub mod repositories;

/// Failures of the persistent store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] DbErr),

    /// Dependent rows were offered for a Location that was never stored.
    #[error("location has no stored id")]
    MissingOwner,
}

/// Shared handle to the relational store. Cloning shares the pool.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if db_url.starts_with("sqlite:") && !db_url.contains(":memory:") {
            let path_str = db_url
                .trim_start_matches("sqlite:")
                .trim_start_matches("//")
                .split('?')
                .next()
                .unwrap_or_default();
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn location_repo(&self) -> repositories::location::LocationRepository {
        repositories::location::LocationRepository::new(self.conn.clone())
    }

    fn weather_repo(&self) -> repositories::weather::WeatherRepository {
        repositories::weather::WeatherRepository::new(self.conn.clone())
    }

    fn business_repo(&self) -> repositories::business::BusinessRepository {
        repositories::business::BusinessRepository::new(self.conn.clone())
    }

    pub async fn find_location(&self, search_query: &str) -> Result<Option<Location>, StoreError> {
        Ok(self.location_repo().find_by_query(search_query).await?)
    }

    pub async fn get_location(&self, id: i32) -> Result<Option<Location>, StoreError> {
        Ok(self.location_repo().get(id).await?)
    }

    /// Replaces a caller-supplied Location with the stored row its id names.
    /// An unknown id is dropped, so nothing can be stored against it.
    pub async fn owning_location(&self, location: &Location) -> Result<Location, StoreError> {
        let Some(id) = location.id else {
            return Ok(location.clone());
        };

        match self.get_location(id).await? {
            Some(stored) => Ok(stored),
            None => {
                warn!(id, "Location id is not stored, treating request as unowned");
                Ok(Location {
                    id: None,
                    ..location.clone()
                })
            }
        }
    }

    /// Stores a Location and returns the stored row, including its id.
    pub async fn add_location(&self, location: &Location) -> Result<Location, StoreError> {
        Ok(self.location_repo().add(location).await?)
    }

    pub async fn get_weather(&self, location_id: i32) -> Result<Vec<Weather>, StoreError> {
        Ok(self.weather_repo().list_for_location(location_id).await?)
    }

    pub async fn add_weather(
        &self,
        location_id: i32,
        entries: &[Weather],
    ) -> Result<(), StoreError> {
        Ok(self.weather_repo().add_batch(location_id, entries).await?)
    }

    pub async fn count_weather(&self, location_id: i32) -> Result<u64, StoreError> {
        Ok(self.weather_repo().count_for_location(location_id).await?)
    }

    pub async fn get_businesses(&self, location_id: i32) -> Result<Vec<Business>, StoreError> {
        Ok(self.business_repo().list_for_location(location_id).await?)
    }

    pub async fn add_businesses(
        &self,
        location_id: i32,
        entries: &[Business],
    ) -> Result<(), StoreError> {
        Ok(self.business_repo().add_batch(location_id, entries).await?)
    }

    pub async fn count_businesses(&self, location_id: i32) -> Result<u64, StoreError> {
        Ok(self.business_repo().count_for_location(location_id).await?)
    }
}
