//! Availability classification
//!
//! Maps the raw availability string from structured data (usually a
//! schema.org URL such as `https://schema.org/InStock`) onto [`ItemStatus`].

use super::schema::ItemStatus;

const SOLD_OUT_TOKEN: &str = "SoldOut";
const IN_STOCK_TOKEN: &str = "InStock";

/// Classify a raw availability string
///
/// `SoldOut` wins over `InStock` when both appear. Anything else, including
/// a missing value, maps to `default`; callers pick that default through
/// `ScrapeConfig::default_item_status` because observed listing handlers
/// disagree on it.
#[must_use]
pub fn classify_availability(raw: Option<&str>, default: ItemStatus) -> ItemStatus {
    match raw {
        Some(text) if text.contains(SOLD_OUT_TOKEN) => ItemStatus::SoldOut,
        Some(text) if text.contains(IN_STOCK_TOKEN) => ItemStatus::Available,
        _ => default,
    }
}
