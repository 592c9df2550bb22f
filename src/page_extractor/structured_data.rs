//! Structured-data (JSON-LD) product lookup
//!
//! Pages embed zero or more `<script type="application/ld+json">` blocks. The
//! first node declaring `@type: "Product"` wins. Blocks that fail to parse
//! are skipped, never reported.

use serde_json::Value;

const PRODUCT_TYPE: &str = "Product";

/// Loosely-typed view over a structured-data `Product` node
#[derive(Debug, Clone, PartialEq)]
pub struct ProductNode(Value);

impl ProductNode {
    /// Select the first `Product` node across `blocks`, in document order
    #[must_use]
    pub fn find(blocks: &[String]) -> Option<Self> {
        blocks.iter().find_map(|block| {
            let value = parse_block(block)?;
            find_product(&value).cloned().map(Self)
        })
    }

    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }

    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.0.get("name").and_then(scalar_to_string)
    }

    #[must_use]
    pub fn description(&self) -> Option<String> {
        self.0.get("description").and_then(scalar_to_string)
    }

    /// `image[0]`, a scalar `image`, or an `ImageObject`'s `url`
    #[must_use]
    pub fn first_image(&self) -> Option<String> {
        let image = match self.0.get("image")? {
            Value::Array(items) => items.first()?,
            other => other,
        };
        match image {
            Value::Object(obj) => obj
                .get("url")
                .or_else(|| obj.get("contentUrl"))
                .and_then(scalar_to_string),
            other => scalar_to_string(other),
        }
    }

    /// `offers.price`, falling back to an aggregate offer's `lowPrice`
    #[must_use]
    pub fn price(&self) -> Option<String> {
        let offer = self.offer()?;
        offer
            .get("price")
            .and_then(scalar_to_string)
            .or_else(|| offer.get("lowPrice").and_then(scalar_to_string))
    }

    #[must_use]
    pub fn availability(&self) -> Option<String> {
        self.offer()?.get("availability").and_then(scalar_to_string)
    }

    #[must_use]
    pub fn seller_name(&self) -> Option<String> {
        self.seller()?.get("name").and_then(scalar_to_string)
    }

    #[must_use]
    pub fn seller_id(&self) -> Option<String> {
        self.seller()?.get("@id").and_then(scalar_to_string)
    }

    /// `offers` as an object, or the first element when it is a list
    fn offer(&self) -> Option<&Value> {
        match self.0.get("offers")? {
            Value::Array(items) => items.first(),
            obj @ Value::Object(_) => Some(obj),
            _ => None,
        }
    }

    /// `offers.seller`, then the node's own `seller`
    fn seller(&self) -> Option<&Value> {
        self.offer()
            .and_then(|offer| offer.get("seller"))
            .filter(|v| v.is_object())
            .or_else(|| self.0.get("seller").filter(|v| v.is_object()))
    }
}

/// Parse one block, tolerating comment/CDATA wrappers and a trailing `;`
#[must_use]
pub fn parse_block(raw: &str) -> Option<Value> {
    let mut text = raw.trim();
    for (open, close) in [("<!--", "-->"), ("//<![CDATA[", "//]]>"), ("<![CDATA[", "]]>")] {
        if let Some(inner) = text.strip_prefix(open) {
            text = inner.strip_suffix(close).unwrap_or(inner).trim();
        }
    }
    let text = text.trim_end_matches(';').trim();
    if text.is_empty() {
        return None;
    }

    match serde_json::from_str(text) {
        Ok(value) => Some(value),
        Err(e) => {
            log::trace!("Skipping malformed structured-data block: {e}");
            None
        }
    }
}

/// Depth-first search through top-level arrays and `@graph` lists
fn find_product(value: &Value) -> Option<&Value> {
    match value {
        Value::Array(items) => items.iter().find_map(find_product),
        Value::Object(obj) => {
            if declares_product(obj.get("@type")) {
                return Some(value);
            }
            obj.get("@graph").and_then(find_product)
        }
        _ => None,
    }
}

fn declares_product(type_value: Option<&Value>) -> bool {
    match type_value {
        Some(Value::String(t)) => t == PRODUCT_TYPE,
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some(PRODUCT_TYPE)),
        _ => false,
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
