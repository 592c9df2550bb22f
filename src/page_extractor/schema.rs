use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Normalized listing availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Available,
    SoldOut,
    #[default]
    Unknown,
}

impl ItemStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::SoldOut => "sold_out",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "available" => Ok(Self::Available),
            "sold_out" => Ok(Self::SoldOut),
            "unknown" => Ok(Self::Unknown),
            other => Err(format!("unknown item status '{other}'")),
        }
    }
}

/// Serialize a failed record's missing status as `""`
fn serialize_status<S>(status: &Option<ItemStatus>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match status {
        Some(status) => serializer.serialize_str(status.as_str()),
        None => serializer.serialize_str(""),
    }
}

fn deserialize_status<'de, D>(deserializer: D) -> Result<Option<ItemStatus>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse().map(Some).map_err(serde::de::Error::custom)
}

/// One extracted listing: the output unit of a batch
///
/// `error` is `None` exactly when extraction completed. A failed record
/// carries empty strings / `None` in every data field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub url: String,
    pub title: String,
    pub price: String,
    pub first_image: String,
    pub description: String,
    #[serde(serialize_with = "serialize_status", deserialize_with = "deserialize_status")]
    pub item_status: Option<ItemStatus>,
    pub seller_name: Option<String>,
    pub seller_id: Option<String>,
    pub error: Option<String>,
}

impl ProductRecord {
    /// Build an isolated failure record for `url`
    #[must_use]
    pub fn failed(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: String::new(),
            price: String::new(),
            first_image: String::new(),
            description: String::new(),
            item_status: None,
            seller_name: None,
            seller_id: None,
            error: Some(error.into()),
        }
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Ordered batch output, index-aligned with the request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResponse {
    pub results: Vec<ProductRecord>,
}

impl BatchResponse {
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Number of records that carry an error
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_failed()).count()
    }
}

/// Whole-call failure payload, `{ "error": "..." }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Fields resolved through the tiered strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Title,
    Price,
    Image,
    Description,
}

/// Signal source, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    StructuredData,
    MetaTag,
    Dom,
}

/// Everything observed about one listing before resolution
///
/// Meta and DOM values are only present for probes that actually ran; a
/// field resolved from structured data never triggers its lower tiers.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSignals {
    pub structured_data: Option<serde_json::Value>,
    pub meta_price: Option<String>,
    pub meta_image: Option<String>,
    pub meta_description: Option<String>,
    pub dom_title: Option<String>,
    pub dom_price: Option<String>,
    pub dom_image: Option<String>,
    pub raw_availability: Option<String>,
    pub resolved_by: HashMap<Field, Tier>,
}

impl RawSignals {
    /// Remember a raw value seen at a non-structured tier
    pub(crate) fn observe(&mut self, field: Field, tier: Tier, raw: &str) {
        let slot = match (tier, field) {
            (Tier::MetaTag, Field::Price) => &mut self.meta_price,
            (Tier::MetaTag, Field::Image) => &mut self.meta_image,
            (Tier::MetaTag, Field::Description) => &mut self.meta_description,
            (Tier::Dom, Field::Title) => &mut self.dom_title,
            (Tier::Dom, Field::Price) => &mut self.dom_price,
            (Tier::Dom, Field::Image) => &mut self.dom_image,
            _ => return,
        };
        if slot.is_none() {
            *slot = Some(raw.to_string());
        }
    }
}
