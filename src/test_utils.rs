//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test products and admins with sensible defaults.

use crate::{
    core::{admin, product::ProductDraft, product as product_ops},
    entities,
    errors::Result,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use tracing_subscriber::EnvFilter;

/// Access key used by [`create_test_admin`].
pub const TEST_ACCESS_KEY: &str = "test-access-key";

/// Routes tracing output to the test harness.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Builds a product in memory without touching any store.
///
/// # Defaults
/// * `category`: "Shoes"
/// * `image` / `buy_url` / `view_url`: non-empty URLs derived from the id
/// * no sub-category, no brand, not featured, not in the carousel
#[must_use]
pub fn sample_product(id: i64, title: &str, price: f64) -> entities::product::Model {
    entities::product::Model {
        id,
        title: title.to_string(),
        price,
        image: format!("https://img.example/{id}.jpg"),
        buy_url: format!("https://buy.example/{id}"),
        view_url: format!("https://view.example/{id}"),
        category: "Shoes".to_string(),
        sub_category: None,
        brand: None,
        featured: false,
        carousel: false,
    }
}

/// Inserts `product` with its own id, for seeding a store with known rows.
pub async fn insert_product(
    db: &DatabaseConnection,
    product: &entities::product::Model,
) -> Result<entities::product::Model> {
    let row = entities::product::ActiveModel {
        id: Set(product.id),
        title: Set(product.title.clone()),
        price: Set(product.price),
        image: Set(product.image.clone()),
        buy_url: Set(product.buy_url.clone()),
        view_url: Set(product.view_url.clone()),
        category: Set(product.category.clone()),
        sub_category: Set(product.sub_category.clone()),
        brand: Set(product.brand.clone()),
        featured: Set(product.featured),
        carousel: Set(product.carousel),
    };
    row.insert(db).await.map_err(Into::into)
}

/// A valid draft in the "Shoes" category with both outbound links set.
#[must_use]
pub fn sample_draft(title: &str, price: f64) -> ProductDraft {
    ProductDraft {
        title: title.to_string(),
        price,
        image: "https://img.example/draft.jpg".to_string(),
        buy_url: "https://buy.example/draft".to_string(),
        view_url: "https://view.example/draft".to_string(),
        category: "Shoes".to_string(),
        sub_category: None,
        brand: None,
        featured: false,
        carousel: false,
    }
}

/// Creates a test product through the admin path.
///
/// # Defaults
/// * price: 10.0
pub async fn create_test_product(
    db: &DatabaseConnection,
    title: &str,
) -> Result<entities::product::Model> {
    product_ops::create_product(db, sample_draft(title, 10.0)).await
}

/// Creates an admin whose access key is [`TEST_ACCESS_KEY`].
pub async fn create_test_admin(
    db: &DatabaseConnection,
    email: &str,
) -> Result<entities::admin::Model> {
    admin::create_admin(db, email, TEST_ACCESS_KEY).await
}

/// App state serving `products` from an in-memory snapshot, with no admin routes.
#[must_use]
pub fn static_app_state(products: Vec<entities::product::Model>) -> crate::web::AppState {
    use crate::{
        core::catalog::{Catalog, PromotionSizes},
        store::{CatalogStore, StaticProductStore},
    };

    let catalog = Catalog::new(
        CatalogStore::Static(StaticProductStore::from_products(products)),
        PromotionSizes::default(),
    );
    crate::web::AppState::new(catalog, None, 12)
}

/// App state reading from and administering `db`.
#[must_use]
pub fn live_app_state(db: std::sync::Arc<DatabaseConnection>) -> crate::web::AppState {
    use crate::{
        core::catalog::{Catalog, PromotionSizes},
        store::{CatalogStore, DatabaseProductStore},
    };

    let catalog = Catalog::new(
        CatalogStore::Database(DatabaseProductStore::new(std::sync::Arc::clone(&db))),
        PromotionSizes::default(),
    );
    crate::web::AppState::new(catalog, Some(db), 12)
}

/// Sends one request through `router` and returns the status and JSON body
/// (`Value::Null` for an empty body).
pub async fn send(
    router: axum::Router,
    request: axum::http::Request<axum::body::Body>,
) -> (axum::http::StatusCode, serde_json::Value) {
    use tower::ServiceExt;

    let response = match router.oneshot(request).await {
        Ok(response) => response,
        Err(infallible) => match infallible {},
    };
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_default();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, body)
}

/// Builds a request with an optional bearer token and JSON body.
#[must_use]
pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> axum::http::Request<axum::body::Body> {
    let mut builder = axum::http::Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            axum::body::Body::from(json.to_string())
        }
        None => axum::body::Body::empty(),
    };
    builder
        .body(body)
        .unwrap_or_else(|_| axum::http::Request::new(axum::body::Body::empty()))
}
