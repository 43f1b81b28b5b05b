//! Price coercion and presentation.
//!
//! Prices are `f64` throughout the crate. Snapshot data sometimes carries them as
//! strings with a currency prefix, so those are coerced by stripping everything that
//! is not part of a number. Formatting back to a currency string only happens at the
//! HTTP boundary via [`format_price`].

use serde::{Deserialize, Deserializer};

/// Coerces a price string to a number by dropping every character that is not an
/// ASCII digit, `.` or `-`.
///
/// Unparsable input yields `0.0`, which keeps such listings sortable.
#[must_use]
pub fn parse_price(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Formats a price as dollars with thousands separators and two decimals,
/// e.g. `1249.5` becomes `"$1,249.50"`.
#[must_use]
pub fn format_price(price: f64) -> String {
    let cents = (price * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();

    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{sign}${grouped}.{:02}", cents % 100)
}

/// Serde helper accepting a price as a JSON number or a currency string.
pub fn deserialize_price<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPrice {
        Number(f64),
        Text(String),
    }

    Ok(match RawPrice::deserialize(deserializer)? {
        RawPrice::Number(value) => value,
        RawPrice::Text(text) => parse_price(&text),
    })
}
