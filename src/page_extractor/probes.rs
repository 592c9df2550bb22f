//! Extraction plan: the ordered probe list behind each field
//!
//! Precedence is data, not control flow. Each field owns a list of probes,
//! tagged with the tier they belong to, and the extractor walks that list
//! until one of them yields a value that survives normalization.

use serde::{Deserialize, Serialize};

use super::schema::{Field, ItemStatus, Tier};
use crate::utils::{
    DESCRIPTION_META_SELECTORS, IMAGE_HOST_PREFIXES, IMAGE_META_SELECTORS, PRICE_META_SELECTORS,
    PRICE_SELECTORS, TITLE_SELECTORS,
};

const META_CONTENT: &str = "content";
const IMAGE_SOURCE: &str = "src";

/// Where a single probe reads its raw value from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeSource {
    /// The field's property on the structured-data `Product` node
    Structured,
    /// Text content of the first match
    Text(String),
    /// Named attribute of the first match
    Attribute { selector: String, attribute: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldProbe {
    pub tier: Tier,
    pub source: ProbeSource,
}

impl FieldProbe {
    #[must_use]
    pub fn structured() -> Self {
        Self {
            tier: Tier::StructuredData,
            source: ProbeSource::Structured,
        }
    }

    #[must_use]
    pub fn meta(selector: impl Into<String>) -> Self {
        Self {
            tier: Tier::MetaTag,
            source: ProbeSource::Attribute {
                selector: selector.into(),
                attribute: META_CONTENT.to_string(),
            },
        }
    }

    #[must_use]
    pub fn dom_text(selector: impl Into<String>) -> Self {
        Self {
            tier: Tier::Dom,
            source: ProbeSource::Text(selector.into()),
        }
    }

    #[must_use]
    pub fn dom_attribute(selector: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            tier: Tier::Dom,
            source: ProbeSource::Attribute {
                selector: selector.into(),
                attribute: attribute.into(),
            },
        }
    }
}

/// Selector tables the plan is built from
///
/// Every list is tried in order. Empty lists simply skip that tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionSelectors {
    pub price_meta: Vec<String>,
    pub image_meta: Vec<String>,
    pub description_meta: Vec<String>,
    pub title: Vec<String>,
    pub price: Vec<String>,
    /// Asset-host prefixes for `<img src>` matching
    pub image_host_prefixes: Vec<String>,
}

fn owned(table: &[&str]) -> Vec<String> {
    table.iter().map(|s| (*s).to_string()).collect()
}

impl Default for ExtractionSelectors {
    fn default() -> Self {
        Self {
            price_meta: owned(PRICE_META_SELECTORS),
            image_meta: owned(IMAGE_META_SELECTORS),
            description_meta: owned(DESCRIPTION_META_SELECTORS),
            title: owned(TITLE_SELECTORS),
            price: owned(PRICE_SELECTORS),
            image_host_prefixes: owned(IMAGE_HOST_PREFIXES),
        }
    }
}

/// Complete per-field probe lists plus the availability default
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionPlan {
    title: Vec<FieldProbe>,
    price: Vec<FieldProbe>,
    image: Vec<FieldProbe>,
    description: Vec<FieldProbe>,
    default_item_status: ItemStatus,
}

impl Default for ExtractionPlan {
    fn default() -> Self {
        Self::from_selectors(&ExtractionSelectors::default(), ItemStatus::default())
    }
}

impl ExtractionPlan {
    /// Build the plan: structured data, then meta tags, then DOM
    #[must_use]
    pub fn from_selectors(selectors: &ExtractionSelectors, default_item_status: ItemStatus) -> Self {
        let title = std::iter::once(FieldProbe::structured())
            .chain(selectors.title.iter().map(FieldProbe::dom_text))
            .collect();

        let price = std::iter::once(FieldProbe::structured())
            .chain(selectors.price_meta.iter().map(FieldProbe::meta))
            .chain(selectors.price.iter().map(FieldProbe::dom_text))
            .collect();

        let image = std::iter::once(FieldProbe::structured())
            .chain(selectors.image_meta.iter().map(FieldProbe::meta))
            .chain(selectors.image_host_prefixes.iter().map(|prefix| {
                FieldProbe::dom_attribute(image_selector(prefix), IMAGE_SOURCE)
            }))
            .collect();

        let description = std::iter::once(FieldProbe::structured())
            .chain(selectors.description_meta.iter().map(FieldProbe::meta))
            .collect();

        Self {
            title,
            price,
            image,
            description,
            default_item_status,
        }
    }

    /// Probes for `field`, in precedence order
    #[must_use]
    pub fn probes(&self, field: Field) -> &[FieldProbe] {
        match field {
            Field::Title => &self.title,
            Field::Price => &self.price,
            Field::Image => &self.image,
            Field::Description => &self.description,
        }
    }

    #[must_use]
    pub fn default_item_status(&self) -> ItemStatus {
        self.default_item_status
    }
}

fn image_selector(prefix: &str) -> String {
    let escaped = prefix.replace('\\', "\\\\").replace('"', "\\\"");
    format!(r#"img[src^="{escaped}"]"#)
}
