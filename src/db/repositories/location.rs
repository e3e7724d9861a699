use crate::entities::{locations, prelude::*};
use crate::models::Location;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set};
use tracing::info;

pub struct LocationRepository {
    conn: DatabaseConnection,
}

impl LocationRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: locations::Model) -> Location {
        Location {
            id: Some(model.id),
            search_query: model.search_query,
            formatted_query: model.formatted_query,
            latitude: model.latitude,
            longitude: model.longitude,
        }
    }

    pub async fn find_by_query(&self, search_query: &str) -> Result<Option<Location>, DbErr> {
        let row = Locations::find()
            .filter(locations::Column::SearchQuery.eq(search_query))
            .one(&self.conn)
            .await?;

        Ok(row.map(Self::map_model))
    }

    pub async fn get(&self, id: i32) -> Result<Option<Location>, DbErr> {
        let row = Locations::find_by_id(id).one(&self.conn).await?;
        Ok(row.map(Self::map_model))
    }

    /// Inserts unless the search query is already stored, then reads the row back.
    /// A concurrent insert of the same query resolves to the row that won.
    pub async fn add(&self, location: &Location) -> Result<Location, DbErr> {
        let active_model = locations::ActiveModel {
            search_query: Set(location.search_query.clone()),
            formatted_query: Set(location.formatted_query.clone()),
            latitude: Set(location.latitude),
            longitude: Set(location.longitude),
            ..Default::default()
        };

        let inserted = Locations::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(locations::Column::SearchQuery)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        if inserted > 0 {
            info!("Stored location for query '{}'", location.search_query);
        }

        self.find_by_query(&location.search_query)
            .await?
            .ok_or_else(|| {
                DbErr::RecordNotFound(format!(
                    "location '{}' missing after insert",
                    location.search_query
                ))
            })
    }
}
