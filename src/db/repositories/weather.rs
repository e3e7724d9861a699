use crate::entities::{prelude::*, weathers};
use crate::models::Weather;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

pub struct WeatherRepository {
    conn: DatabaseConnection,
}

impl WeatherRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Entries in the order they were fetched.
    pub async fn list_for_location(&self, location_id: i32) -> Result<Vec<Weather>, DbErr> {
        let rows = Weathers::find()
            .filter(weathers::Column::LocationId.eq(location_id))
            .order_by_asc(weathers::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|m| Weather {
                forecast: m.forecast,
                time: m.time,
            })
            .collect())
    }

    /// One multi-row INSERT, so a batch lands whole or not at all.
    pub async fn add_batch(&self, location_id: i32, entries: &[Weather]) -> Result<(), DbErr> {
        if entries.is_empty() {
            return Ok(());
        }

        let models = entries.iter().map(|w| weathers::ActiveModel {
            forecast: Set(w.forecast.clone()),
            time: Set(w.time),
            location_id: Set(location_id),
            ..Default::default()
        });

        Weathers::insert_many(models)
            .exec_without_returning(&self.conn)
            .await?;

        Ok(())
    }

    pub async fn count_for_location(&self, location_id: i32) -> Result<u64, DbErr> {
        Weathers::find()
            .filter(weathers::Column::LocationId.eq(location_id))
            .count(&self.conn)
            .await
    }
}
