//! "You may also like" selection for a product page.

use crate::{
    core::sampling::{date_seed, seeded_shuffle},
    entities::product,
};
use chrono::NaiveDate;

/// Seed for a reference product's recommendations on `date`.
///
/// Mixing the product id into the daily seed keeps each product page stable for
/// the day while different products still get differently ordered suggestions.
#[must_use]
pub fn recommendation_seed(reference_id: i64, date: NaiveDate) -> u64 {
    date_seed(date).wrapping_add(reference_id.unsigned_abs())
}

fn is_related(reference: &product::Model, candidate: &product::Model) -> bool {
    if candidate.category == reference.category {
        return true;
    }
    reference
        .brand
        .as_deref()
        .filter(|brand| !brand.trim().is_empty())
        .is_some_and(|brand| candidate.brand.as_deref() == Some(brand))
}

/// Picks up to `limit` products related to `reference`.
///
/// Related means same category or same brand, never the reference itself. The
/// related pool is shuffled with `seed`. When nothing is related, the first
/// `limit` other products in source order are returned instead so the section is
/// never empty while the catalog has other items.
#[must_use]
pub fn recommend(
    reference: &product::Model,
    products: &[product::Model],
    limit: usize,
    seed: u64,
) -> Vec<product::Model> {
    let others = products.iter().filter(|p| p.id != reference.id);

    let mut pool: Vec<product::Model> = others
        .clone()
        .filter(|p| is_related(reference, p))
        .cloned()
        .collect();

    if pool.is_empty() {
        return others.take(limit).cloned().collect();
    }

    seeded_shuffle(&mut pool, seed);
    pool.truncate(limit);
    pool
}
