use crate::entities::{prelude::*, yelps};
use crate::models::Business;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

pub struct BusinessRepository {
    conn: DatabaseConnection,
}

impl BusinessRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_for_location(&self, location_id: i32) -> Result<Vec<Business>, DbErr> {
        let rows = Yelps::find()
            .filter(yelps::Column::LocationId.eq(location_id))
            .order_by_asc(yelps::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|m| Business {
                name: m.name,
                image_url: m.image_url,
                price: m.price,
                rating: m.rating,
                url: m.url,
            })
            .collect())
    }

    pub async fn add_batch(&self, location_id: i32, entries: &[Business]) -> Result<(), DbErr> {
        if entries.is_empty() {
            return Ok(());
        }

        let models = entries.iter().map(|b| yelps::ActiveModel {
            name: Set(b.name.clone()),
            image_url: Set(b.image_url.clone()),
            price: Set(b.price.clone()),
            rating: Set(b.rating),
            url: Set(b.url.clone()),
            location_id: Set(location_id),
            ..Default::default()
        });

        Yelps::insert_many(models)
            .exec_without_returning(&self.conn)
            .await?;

        Ok(())
    }

    pub async fn count_for_location(&self, location_id: i32) -> Result<u64, DbErr> {
        Yelps::find()
            .filter(yelps::Column::LocationId.eq(location_id))
            .count(&self.conn)
            .await
    }
}
