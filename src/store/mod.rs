//! Product stores behind the [`ProductRepository`] capability.
//!
//! The catalog never knows whether it is reading the bundled snapshot or the live
//! table. The running mode is picked once at startup and wrapped in
//! [`CatalogStore`].

use crate::{core::query::ProductFilter, entities::product, errors::Result};
use std::future::Future;

/// Live `products` table store
pub mod database;
/// Bundled JSON snapshot store
pub mod static_source;

pub use database::DatabaseProductStore;
pub use static_source::{SnapshotLocation, StaticProductStore};

/// Read access to a product source.
///
/// `fetch` may apply any part of the filter early, or none of it; callers must
/// still run [`ProductFilter::matches`] on what comes back. Results are in the
/// source's base order (file order for the snapshot, ascending id for the table).
pub trait ProductRepository: Send + Sync {
    /// Products that may match `filter`, in base order.
    fn fetch(
        &self,
        filter: &ProductFilter,
    ) -> impl Future<Output = Result<Vec<product::Model>>> + Send;

    /// The product with this id, if any.
    fn find_by_id(&self, id: i64)
    -> impl Future<Output = Result<Option<product::Model>>> + Send;

    /// Drops anything cached and returns how many products the source now holds.
    fn refresh(&self) -> impl Future<Output = Result<usize>> + Send;

    /// Short name used in logs.
    fn source_name(&self) -> &'static str;
}

/// The store selected by `CATALOG_MODE`.
pub enum CatalogStore {
    /// Read-only snapshot
    Static(StaticProductStore),
    /// Live table
    Database(DatabaseProductStore),
}

impl ProductRepository for CatalogStore {
    async fn fetch(&self, filter: &ProductFilter) -> Result<Vec<product::Model>> {
        match self {
            Self::Static(store) => store.fetch(filter).await,
            Self::Database(store) => store.fetch(filter).await,
        }
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<product::Model>> {
        match self {
            Self::Static(store) => store.find_by_id(id).await,
            Self::Database(store) => store.find_by_id(id).await,
        }
    }

    async fn refresh(&self) -> Result<usize> {
        match self {
            Self::Static(store) => store.refresh().await,
            Self::Database(store) => store.refresh().await,
        }
    }

    fn source_name(&self) -> &'static str {
        match self {
            Self::Static(store) => store.source_name(),
            Self::Database(store) => store.source_name(),
        }
    }
}
