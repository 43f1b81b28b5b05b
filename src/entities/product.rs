//! Product entity - A catalog listing with outbound affiliate links.
//!
//! The same model is read from the live `products` table and deserialized from the
//! bundled JSON snapshot, so the serde attributes accept the snapshot's camelCase
//! keys and its loosely typed `id` and `price` values.

use crate::core::price::deserialize_price;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier within a source; larger ids are newer listings
    #[sea_orm(primary_key)]
    #[serde(deserialize_with = "deserialize_id")]
    pub id: i64,
    /// Listing title shown on the storefront
    pub title: String,
    /// Numeric price; snapshot strings such as `"$129.99"` are coerced on load
    #[serde(deserialize_with = "deserialize_price")]
    pub price: f64,
    /// Image URL, may be empty
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
    /// Outbound affiliate link to buy the item
    #[serde(default, deserialize_with = "null_as_default")]
    pub buy_url: String,
    /// Outbound link to view the item on the marketplace
    #[serde(default, deserialize_with = "null_as_default")]
    pub view_url: String,
    /// Top-level category (e.g., "Shoes")
    pub category: String,
    /// Optional finer grouping inside the category
    #[serde(default)]
    pub sub_category: Option<String>,
    /// Optional brand name
    #[serde(default)]
    pub brand: Option<String>,
    /// Promoted first under the default sort order
    #[serde(default, alias = "isFeatured", deserialize_with = "null_as_default")]
    pub featured: bool,
    /// Eligible for the rotating promotional carousel
    #[serde(default, alias = "isCarousel", deserialize_with = "null_as_default")]
    pub carousel: bool,
}

impl Model {
    /// Whether the product can appear in promotional sampling.
    ///
    /// A listing without an image or without a buy link renders as a broken card,
    /// so both must be non-blank.
    #[must_use]
    pub fn is_promotable(&self) -> bool {
        !self.image.trim().is_empty() && !self.buy_url.trim().is_empty()
    }
}

/// Products have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Reads an explicit `null` as the field's default.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts an id written either as a JSON number or as a numeric string.
fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(id) => Ok(id),
        RawId::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid product id: {text:?}"))),
    }
}
