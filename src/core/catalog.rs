//! The storefront's single query interface.
//!
//! [`Catalog`] answers every storefront read the same way regardless of which
//! [`ProductRepository`] it wraps: the store supplies candidates, and the filtering,
//! sorting, paging and promotional sampling all happen here.

use crate::{
    core::{
        query::{Page, PageRequest, ProductFilter, SortOrder, run_query},
        recommend::{recommend, recommendation_seed},
        sampling::daily_sample,
    },
    entities::product,
    errors::Result,
    store::ProductRepository,
};
use chrono::{Local, NaiveDate};
use tracing::{debug, info, instrument};

/// How many products each promotional section shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromotionSizes {
    /// Carousel size
    pub carousel: usize,
    /// Best-seller row size
    pub best_sellers: usize,
}

impl Default for PromotionSizes {
    fn default() -> Self {
        Self {
            carousel: 10,
            best_sellers: 8,
        }
    }
}

/// A category listing request.
#[derive(Debug, Clone)]
pub struct ProductQuery {
    /// Category, sub-category and brand filters
    pub filter: ProductFilter,
    /// Ordering
    pub sort: SortOrder,
    /// Page to return
    pub page: PageRequest,
}

/// A free-text search request.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// Search text; blank matches everything
    pub text: String,
    /// Optional brand restriction
    pub brand: Option<String>,
    /// Ordering
    pub sort: SortOrder,
    /// Page to return
    pub page: PageRequest,
}

/// Catalog reads over one product store.
pub struct Catalog<R> {
    store: R,
    promotions: PromotionSizes,
}

impl<R: ProductRepository> Catalog<R> {
    /// Creates a catalog reading from `store`.
    #[must_use]
    pub const fn new(store: R, promotions: PromotionSizes) -> Self {
        Self { store, promotions }
    }

    /// Reloads the underlying store and returns how many products it now holds.
    pub async fn refresh(&self) -> Result<usize> {
        let count = self.store.refresh().await?;
        info!(
            "Catalog refreshed from {}: {} products",
            self.store.source_name(),
            count
        );
        Ok(count)
    }

    /// Filtered, sorted, paged product listing.
    #[instrument(skip(self), fields(source = self.store.source_name()))]
    pub async fn products(&self, query: &ProductQuery) -> Result<Page<product::Model>> {
        let candidates = self.store.fetch(&query.filter).await?;
        let page = run_query(candidates, &query.filter, query.sort, query.page);
        debug!(
            "Listing matched {} products",
            page.pagination.total_items
        );
        Ok(page)
    }

    /// Looks up one product.
    pub async fn product_by_id(&self, id: i64) -> Result<Option<product::Model>> {
        self.store.find_by_id(id).await
    }

    /// Every featured product in source order.
    pub async fn featured_products(&self) -> Result<Vec<product::Model>> {
        let products = self.store.fetch(&ProductFilter::default()).await?;
        Ok(products.into_iter().filter(|p| p.featured).collect())
    }

    /// Today's carousel selection.
    pub async fn carousel_products(&self) -> Result<Vec<product::Model>> {
        self.carousel_products_on(Local::now().date_naive()).await
    }

    /// Carousel selection for `date`: promotable carousel products, sampled down to
    /// the configured carousel size.
    pub async fn carousel_products_on(&self, date: NaiveDate) -> Result<Vec<product::Model>> {
        let eligible: Vec<product::Model> = self
            .store
            .fetch(&ProductFilter::default())
            .await?
            .into_iter()
            .filter(|p| p.carousel && p.is_promotable())
            .collect();
        Ok(daily_sample(&eligible, self.promotions.carousel, date))
    }

    /// Today's best-seller selection.
    pub async fn best_seller_products(&self) -> Result<Vec<product::Model>> {
        self.best_seller_products_on(Local::now().date_naive()).await
    }

    /// Best sellers for `date`: promotable featured products, sampled down to the
    /// configured row size.
    pub async fn best_seller_products_on(&self, date: NaiveDate) -> Result<Vec<product::Model>> {
        let eligible: Vec<product::Model> = self
            .store
            .fetch(&ProductFilter::default())
            .await?
            .into_iter()
            .filter(|p| p.featured && p.is_promotable())
            .collect();
        Ok(daily_sample(&eligible, self.promotions.best_sellers, date))
    }

    /// Title search, optionally within one brand.
    #[instrument(skip(self), fields(source = self.store.source_name()))]
    pub async fn search_products(&self, query: &SearchQuery) -> Result<Page<product::Model>> {
        let filter = ProductFilter {
            brand: query.brand.clone(),
            search: Some(query.text.clone()),
            ..ProductFilter::default()
        };
        let candidates = self.store.fetch(&filter).await?;
        Ok(run_query(candidates, &filter, query.sort, query.page))
    }

    /// Today's recommendations for `reference`.
    pub async fn recommendations(
        &self,
        reference: &product::Model,
        limit: usize,
    ) -> Result<Vec<product::Model>> {
        self.recommendations_on(reference, limit, Local::now().date_naive())
            .await
    }

    /// Recommendations for `reference` on `date`; stable for the same product and day.
    pub async fn recommendations_on(
        &self,
        reference: &product::Model,
        limit: usize,
        date: NaiveDate,
    ) -> Result<Vec<product::Model>> {
        let products = self.store.fetch(&ProductFilter::default()).await?;
        Ok(recommend(
            reference,
            &products,
            limit,
            recommendation_seed(reference.id, date),
        ))
    }
}
