//! Read-only product store backed by a bundled JSON snapshot.
//!
//! The snapshot is a JSON array of product documents. It is looked up in a list of
//! candidate locations (files or `http(s)` URLs) tried in order. A location that
//! fails is logged and skipped; when all of them fail the store serves an empty
//! catalog instead of an error, so the storefront shows "no products" rather than
//! breaking. Only successful loads are cached.

use crate::{
    core::query::ProductFilter,
    entities::product,
    errors::{Error, Result},
    store::ProductRepository,
};
use std::{collections::HashSet, fmt, path::PathBuf, sync::Arc};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// Where a snapshot may be found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotLocation {
    /// Local file
    File(PathBuf),
    /// Remote document fetched over HTTP
    Url(String),
}

impl SnapshotLocation {
    /// Reads `http://` and `https://` prefixes as URLs and anything else as a path.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Self::Url(raw.to_string())
        } else {
            Self::File(PathBuf::from(raw))
        }
    }
}

impl fmt::Display for SnapshotLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Snapshot store owning its loaded copy of the catalog.
pub struct StaticProductStore {
    locations: Vec<SnapshotLocation>,
    http: reqwest::Client,
    cache: RwLock<Option<Arc<Vec<product::Model>>>>,
}

impl StaticProductStore {
    /// Creates a store that loads lazily from `locations` on first use.
    #[must_use]
    pub fn new(locations: Vec<SnapshotLocation>) -> Self {
        Self {
            locations,
            http: reqwest::Client::new(),
            cache: RwLock::new(None),
        }
    }

    /// Creates a store already holding `products`, with nowhere to reload from.
    #[must_use]
    pub fn from_products(products: Vec<product::Model>) -> Self {
        Self {
            locations: Vec::new(),
            http: reqwest::Client::new(),
            cache: RwLock::new(Some(Arc::new(products))),
        }
    }

    /// The loaded catalog, loading it on first call.
    pub async fn products(&self) -> Arc<Vec<product::Model>> {
        if let Some(products) = self.cache.read().await.as_ref() {
            return Arc::clone(products);
        }

        let mut cache = self.cache.write().await;
        // Another request may have finished loading while we waited
        if let Some(products) = cache.as_ref() {
            return Arc::clone(products);
        }

        match self.load().await {
            Some(products) => {
                let products = Arc::new(products);
                *cache = Some(Arc::clone(&products));
                products
            }
            None => Arc::new(Vec::new()),
        }
    }

    /// Drops the cached copy and loads again.
    async fn reload(&self) -> Arc<Vec<product::Model>> {
        if self.locations.is_empty() {
            return self.products().await;
        }
        info!("Refreshing static product snapshot...");
        self.cache.write().await.take();
        self.products().await
    }

    async fn load(&self) -> Option<Vec<product::Model>> {
        for location in &self.locations {
            match self.read_location(location).await {
                Ok(products) => {
                    let products = dedupe_ids(products, location);
                    info!(
                        "Loaded {} products from snapshot {}",
                        products.len(),
                        location
                    );
                    return Some(products);
                }
                Err(e) => warn!("Snapshot location {} failed: {}", location, e),
            }
        }

        error!(
            "No product snapshot could be loaded from {} location(s); serving an empty catalog",
            self.locations.len()
        );
        None
    }

    async fn read_location(&self, location: &SnapshotLocation) -> Result<Vec<product::Model>> {
        debug!("Reading product snapshot from {}", location);
        let bytes = match location {
            SnapshotLocation::File(path) => tokio::fs::read(path).await?,
            SnapshotLocation::Url(url) => {
                let response = self.http.get(url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(Error::DataSource {
                        location: location.to_string(),
                        message: status
                            .canonical_reason()
                            .map_or_else(|| status.to_string(), str::to_string),
                    });
                }
                response.bytes().await?.to_vec()
            }
        };

        let records: Vec<serde_json::Value> = serde_json::from_slice(&bytes)?;
        Ok(parse_records(records, location))
    }
}

/// Parses each record on its own; a malformed record is logged and skipped.
fn parse_records(
    records: Vec<serde_json::Value>,
    location: &SnapshotLocation,
) -> Vec<product::Model> {
    records
        .into_iter()
        .enumerate()
        .filter_map(
            |(index, record)| match serde_json::from_value::<product::Model>(record) {
                Ok(product) => Some(product),
                Err(e) => {
                    warn!("Skipping record {} in snapshot {}: {}", index, location, e);
                    None
                }
            },
        )
        .collect()
}

/// Keeps the first product for each id.
fn dedupe_ids(products: Vec<product::Model>, location: &SnapshotLocation) -> Vec<product::Model> {
    let mut seen = HashSet::with_capacity(products.len());
    let before = products.len();
    let unique: Vec<product::Model> = products.into_iter().filter(|p| seen.insert(p.id)).collect();
    if unique.len() != before {
        warn!(
            "Snapshot {} has {} duplicate product id(s); keeping first occurrences",
            location,
            before - unique.len()
        );
    }
    unique
}

impl ProductRepository for StaticProductStore {
    async fn fetch(&self, filter: &ProductFilter) -> Result<Vec<product::Model>> {
        let products = self.products().await;
        Ok(products.iter().filter(|p| filter.matches(p)).cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<product::Model>> {
        let products = self.products().await;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn refresh(&self) -> Result<usize> {
        Ok(self.reload().await.len())
    }

    fn source_name(&self) -> &'static str {
        "static"
    }
}
