//! Product store backed by the live `products` table.

use crate::{
    core::query::ProductFilter,
    entities::{Product, product},
    errors::Result,
    store::ProductRepository,
};
use sea_orm::{PaginatorTrait, QueryOrder, prelude::*};
use std::sync::Arc;
use tracing::debug;

/// Reads products through a SeaORM connection shared with the admin API.
pub struct DatabaseProductStore {
    db: Arc<DatabaseConnection>,
}

impl DatabaseProductStore {
    /// Wraps an open connection.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl ProductRepository for DatabaseProductStore {
    /// Pushes the equality filters into the query; text search is left to the caller.
    async fn fetch(&self, filter: &ProductFilter) -> Result<Vec<product::Model>> {
        let mut query = Product::find();
        if let Some(category) = &filter.category {
            query = query.filter(product::Column::Category.eq(category.as_str()));
        }
        if let Some(sub_category) = &filter.sub_category {
            query = query.filter(product::Column::SubCategory.eq(sub_category.as_str()));
        }
        if let Some(brand) = &filter.brand {
            query = query.filter(product::Column::Brand.eq(brand.as_str()));
        }

        query
            .order_by_asc(product::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(Into::into)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<product::Model>> {
        Product::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(Into::into)
    }

    /// Rows are read on every call, so there is nothing to reload.
    async fn refresh(&self) -> Result<usize> {
        let count = Product::find().count(self.db.as_ref()).await?;
        debug!("Live store holds {} products", count);
        Ok(count as usize)
    }

    fn source_name(&self) -> &'static str {
        "database"
    }
}
