//! Route handlers.
//!
//! Handlers translate query strings and JSON bodies into catalog calls and wrap
//! products in [`ProductView`], which adds the formatted price.

/// Session-gated catalog management
pub mod admin;
/// Public catalog reads
pub mod storefront;

use crate::{core::price::format_price, entities::product};
use serde::Serialize;

/// A product as sent to the browser.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    /// The stored product, flattened into the same object
    #[serde(flatten)]
    pub product: product::Model,
    /// Price formatted for display, e.g. `"$1,249.50"`
    pub display_price: String,
}

impl From<product::Model> for ProductView {
    fn from(product: product::Model) -> Self {
        let display_price = format_price(product.price);
        Self {
            product,
            display_price,
        }
    }
}

/// Converts a list of products for a response body.
#[must_use]
pub fn views(products: Vec<product::Model>) -> Vec<ProductView> {
    products.into_iter().map(ProductView::from).collect()
}
