//! Product administration - Handles writes to the live `products` table.
//!
//! This module provides functions for listing, creating, updating, and deleting
//! catalog products on behalf of an authenticated admin. Every write validates its
//! input first so that a bad request never reaches the database. Deletion is
//! permanent; the catalog keeps no history.

use crate::{
    core::price::deserialize_price,
    entities::{Product, product},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Deserialize;

/// The editable fields of a product, as submitted by the admin panel.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    /// Listing title
    pub title: String,
    /// Price as a number or a currency string
    #[serde(deserialize_with = "deserialize_price")]
    pub price: f64,
    /// Image URL
    #[serde(default)]
    pub image: String,
    /// Outbound buy link
    #[serde(default)]
    pub buy_url: String,
    /// Outbound view link
    #[serde(default)]
    pub view_url: String,
    /// Category
    pub category: String,
    /// Optional sub-category
    #[serde(default)]
    pub sub_category: Option<String>,
    /// Optional brand
    #[serde(default)]
    pub brand: Option<String>,
    /// Featured flag
    #[serde(default)]
    pub featured: bool,
    /// Carousel flag
    #[serde(default)]
    pub carousel: bool,
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Checks a draft and returns it with surrounding whitespace removed and blank
/// optional fields turned into `None`.
///
/// # Errors
/// Returns an error if:
/// - The title or category is empty or whitespace-only
/// - The price is negative or not finite (NaN, infinity)
pub fn validate_draft(draft: ProductDraft) -> Result<ProductDraft> {
    if draft.title.trim().is_empty() {
        return Err(Error::InvalidProduct {
            message: "Product title cannot be empty".to_string(),
        });
    }

    if draft.category.trim().is_empty() {
        return Err(Error::InvalidProduct {
            message: "Product category cannot be empty".to_string(),
        });
    }

    if !draft.price.is_finite() || draft.price < 0.0 {
        return Err(Error::InvalidPrice { price: draft.price });
    }

    Ok(ProductDraft {
        title: draft.title.trim().to_string(),
        price: draft.price,
        image: draft.image.trim().to_string(),
        buy_url: draft.buy_url.trim().to_string(),
        view_url: draft.view_url.trim().to_string(),
        category: draft.category.trim().to_string(),
        sub_category: optional_text(draft.sub_category),
        brand: optional_text(draft.brand),
        featured: draft.featured,
        carousel: draft.carousel,
    })
}

/// Retrieves every product, oldest first, for the admin product table.
pub async fn get_all_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .order_by_asc(product::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific product by its unique ID.
pub async fn get_product_by_id(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Option<product::Model>> {
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Inserts a new product and returns it with its assigned id.
///
/// # Errors
/// Returns an error if the draft fails [`validate_draft`] or the insert fails.
pub async fn create_product(db: &DatabaseConnection, draft: ProductDraft) -> Result<product::Model> {
    let draft = validate_draft(draft)?;

    let product = product::ActiveModel {
        title: Set(draft.title),
        price: Set(draft.price),
        image: Set(draft.image),
        buy_url: Set(draft.buy_url),
        view_url: Set(draft.view_url),
        category: Set(draft.category),
        sub_category: Set(draft.sub_category),
        brand: Set(draft.brand),
        featured: Set(draft.featured),
        carousel: Set(draft.carousel),
        ..Default::default()
    };
    product.insert(db).await.map_err(Into::into)
}

/// Replaces every editable field of an existing product.
///
/// # Errors
/// Returns an error if:
/// - The draft fails [`validate_draft`]
/// - The product does not exist
/// - The database update operation fails
pub async fn update_product(
    db: &DatabaseConnection,
    product_id: i64,
    draft: ProductDraft,
) -> Result<product::Model> {
    let draft = validate_draft(draft)?;

    let mut product: product::ActiveModel = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?
        .into();

    product.title = Set(draft.title);
    product.price = Set(draft.price);
    product.image = Set(draft.image);
    product.buy_url = Set(draft.buy_url);
    product.view_url = Set(draft.view_url);
    product.category = Set(draft.category);
    product.sub_category = Set(draft.sub_category);
    product.brand = Set(draft.brand);
    product.featured = Set(draft.featured);
    product.carousel = Set(draft.carousel);

    product.update(db).await.map_err(Into::into)
}

/// Permanently deletes a product and returns what was removed.
///
/// # Errors
/// Returns an error if the product does not exist or the delete fails.
pub async fn delete_product(db: &DatabaseConnection, product_id: i64) -> Result<product::Model> {
    let product = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    Product::delete_by_id(product_id).exec(db).await?;
    Ok(product)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_product_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        // Test empty title validation
        let result = create_product(&db, sample_draft("", 10.0)).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidProduct { .. }));

        // Test whitespace-only title validation
        let result = create_product(&db, sample_draft("   ", 10.0)).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidProduct { .. }));

        // Test blank category validation
        let mut draft = sample_draft("Tote", 10.0);
        draft.category = " ".to_string();
        let result = create_product(&db, draft).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidProduct { .. }));

        // Test negative price validation
        let result = create_product(&db, sample_draft("Tote", -10.0)).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidPrice { price: -10.0 }
        ));

        // Test NaN price validation
        let result = create_product(&db, sample_draft("Tote", f64::NAN)).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidPrice { .. }));

        // Test infinity price validation
        let result = create_product(&db, sample_draft("Tote", f64::INFINITY)).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidPrice { .. }));

        Ok(())
    }

    #[test]
    fn test_validate_draft_normalizes_text() {
        let mut draft = sample_draft("  Court Sneaker ", 99.0);
        draft.brand = Some("   ".to_string());
        draft.sub_category = Some(" Low-tops ".to_string());

        let clean = validate_draft(draft).unwrap();
        assert_eq!(clean.title, "Court Sneaker");
        assert_eq!(clean.brand, None);
        assert_eq!(clean.sub_category.as_deref(), Some("Low-tops"));
    }

    #[test]
    fn test_draft_accepts_string_price() {
        let json = r#"{"title": "Tote", "price": "$45.00", "category": "Bags",
                       "buyUrl": "https://buy.example/tote"}"#;
        let draft: ProductDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.price, 45.0);
        assert_eq!(draft.buy_url, "https://buy.example/tote");
        assert!(!draft.featured);
    }

    #[tokio::test]
    async fn test_create_product_integration() -> Result<()> {
        let db = setup_test_db().await?;

        let product = create_product(&db, sample_draft("Court Sneaker", 120.0)).await?;

        assert_eq!(product.title, "Court Sneaker");
        assert_eq!(product.price, 120.0);
        assert_eq!(product.category, "Shoes");
        assert!(product.id > 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_all_products_oldest_first() -> Result<()> {
        let db = setup_test_db().await?;

        let first = create_test_product(&db, "First").await?;
        let second = create_test_product(&db, "Second").await?;

        let products = get_all_products(&db).await?;
        assert_eq!(products, vec![first, second]);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_product_integration() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Original Title").await?;

        let mut draft = sample_draft("Updated Title", 15.0);
        draft.featured = true;
        draft.brand = Some("Acme".to_string());
        let updated = update_product(&db, product.id, draft).await?;

        assert_eq!(updated.id, product.id);
        assert_eq!(updated.title, "Updated Title");
        assert_eq!(updated.price, 15.0);
        assert!(updated.featured);

        // Verify the update persisted
        let retrieved = get_product_by_id(&db, product.id).await?.unwrap();
        assert_eq!(retrieved, updated);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_product_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = update_product(&db, 999, sample_draft("Ghost", 1.0)).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::ProductNotFound { id: 999 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_product_integration() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Doomed").await?;

        let deleted = delete_product(&db, product.id).await?;
        assert_eq!(deleted, product);

        // Hard delete - the row is gone
        assert!(get_product_by_id(&db, product.id).await?.is_none());
        assert!(get_all_products(&db).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_product_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = delete_product(&db, 999).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::ProductNotFound { id: 999 }
        ));

        Ok(())
    }
}
