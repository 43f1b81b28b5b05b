//! Deterministic daily sampling for promotional sections.
//!
//! The carousel and best-seller rows should look the same on every page load during
//! a day without any server-side bookkeeping. A seed derived from the local date
//! drives a Fisher–Yates shuffle whose swap indices come from a small
//! linear-congruential generator, so the same day always yields the same subset.
//! This is not a source of secure or fair randomness.

use chrono::NaiveDate;

const LCG_MULTIPLIER: u64 = 9301;
const LCG_INCREMENT: u64 = 49_297;
const LCG_MODULUS: u64 = 233_280;

/// Sums the character codes of the date rendered as `YYYY-MM-DD`.
#[must_use]
pub fn date_seed(date: NaiveDate) -> u64 {
    date.format("%Y-%m-%d")
        .to_string()
        .chars()
        .map(|c| u64::from(u32::from(c)))
        .sum()
}

/// Shuffles `items` in place, walking from the last index down to 1 and reseeding
/// the generator from its previous output at every step.
#[allow(clippy::cast_precision_loss, clippy::cast_sign_loss)]
pub fn seeded_shuffle<T>(items: &mut [T], seed: u64) {
    let mut state = seed % LCG_MODULUS;
    for i in (1..items.len()).rev() {
        state = (state * LCG_MULTIPLIER + LCG_INCREMENT) % LCG_MODULUS;
        // Evaluated in f64: integer division rounds differently for some states
        let j = ((state as f64 / LCG_MODULUS as f64) * (i + 1) as f64).floor() as usize;
        items.swap(i, j);
    }
}

/// Returns `n` distinct items chosen by a shuffle seeded with `seed`.
///
/// When the collection has `n` or fewer items it is returned as is, in its
/// original order.
#[must_use]
pub fn sample_distinct<T: Clone>(items: &[T], n: usize, seed: u64) -> Vec<T> {
    if items.len() <= n {
        return items.to_vec();
    }

    let mut shuffled = items.to_vec();
    seeded_shuffle(&mut shuffled, seed);
    shuffled.truncate(n);
    shuffled
}

/// [`sample_distinct`] seeded by [`date_seed`] for `date`.
#[must_use]
pub fn daily_sample<T: Clone>(items: &[T], n: usize, date: NaiveDate) -> Vec<T> {
    sample_distinct(items, n, date_seed(date))
}
