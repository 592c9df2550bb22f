//! Per-field value normalization
//!
//! Every normalizer returns `None` for values that should count as
//! unresolved, which sends the field on to its next probe.

use super::schema::Field;
use crate::utils::resolve_against;

/// Strip everything except ASCII digits
///
/// `"¥3,480"` becomes `"3480"`. An all-stripped result is unresolved.
#[must_use]
pub fn normalize_price(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    (!digits.is_empty()).then_some(digits)
}

/// Trim surrounding whitespace; blank is unresolved
#[must_use]
pub fn normalize_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Trim and resolve relative image references against the page URL
#[must_use]
pub fn normalize_image(raw: &str, page_url: &str) -> Option<String> {
    normalize_text(raw).map(|src| resolve_against(page_url, &src))
}

/// Dispatch to the normalizer for `field`
#[must_use]
pub fn normalize_field(field: Field, raw: &str, page_url: &str) -> Option<String> {
    match field {
        Field::Price => normalize_price(raw),
        Field::Image => normalize_image(raw, page_url),
        Field::Title | Field::Description => normalize_text(raw),
    }
}
