//! Tiered field extraction against a ready page
//!
//! Extraction never fails. Each probe is a separate round trip to the
//! render backend; a probe that errors, matches nothing, or yields a value
//! that normalizes to nothing is treated as an absent signal and the next
//! probe in the field's list runs.

use log::{debug, trace};

use super::availability::classify_availability;
use super::normalize::{normalize_field, normalize_text};
use super::probes::{ExtractionPlan, FieldProbe, ProbeSource};
use super::schema::{Field, ProductRecord, RawSignals, Tier};
use super::structured_data::ProductNode;
use crate::render_session::RenderPage;

/// Result of extracting one listing
#[derive(Debug, Clone)]
pub struct Extraction {
    pub record: ProductRecord,
    pub signals: RawSignals,
}

/// Resolve every field of `url`'s record from the current document in `page`
pub async fn extract<P: RenderPage>(page: &P, url: &str, plan: &ExtractionPlan) -> Extraction {
    let blocks = match page.structured_data_blocks().await {
        Ok(blocks) => blocks,
        Err(e) => {
            trace!("Structured-data probe failed for {url}: {e}");
            Vec::new()
        }
    };

    let product = ProductNode::find(&blocks);
    let mut signals = RawSignals {
        structured_data: product.as_ref().map(|node| node.as_value().clone()),
        raw_availability: product.as_ref().and_then(ProductNode::availability),
        ..RawSignals::default()
    };

    let title = resolve_field(page, url, plan, Field::Title, product.as_ref(), &mut signals).await;
    let price = resolve_field(page, url, plan, Field::Price, product.as_ref(), &mut signals).await;
    let first_image =
        resolve_field(page, url, plan, Field::Image, product.as_ref(), &mut signals).await;
    let description =
        resolve_field(page, url, plan, Field::Description, product.as_ref(), &mut signals).await;

    let item_status = classify_availability(
        signals.raw_availability.as_deref(),
        plan.default_item_status(),
    );

    let seller_name = product
        .as_ref()
        .and_then(ProductNode::seller_name)
        .and_then(|name| normalize_text(&name));
    let seller_id = product
        .as_ref()
        .and_then(ProductNode::seller_id)
        .and_then(|id| normalize_text(&id));

    debug!(
        "Extracted {url}: resolved_by={:?} structured_data={}",
        signals.resolved_by,
        signals.structured_data.is_some()
    );

    Extraction {
        record: ProductRecord {
            url: url.to_string(),
            title: title.unwrap_or_default(),
            price: price.unwrap_or_default(),
            first_image: first_image.unwrap_or_default(),
            description: description.unwrap_or_default(),
            item_status: Some(item_status),
            seller_name,
            seller_id,
            error: None,
        },
        signals,
    }
}

/// Walk `field`'s probes until one resolves
async fn resolve_field<P: RenderPage>(
    page: &P,
    url: &str,
    plan: &ExtractionPlan,
    field: Field,
    product: Option<&ProductNode>,
    signals: &mut RawSignals,
) -> Option<String> {
    for probe in plan.probes(field) {
        let Some(raw) = run_probe(page, url, probe, field, product).await else {
            continue;
        };

        if probe.tier != Tier::StructuredData {
            signals.observe(field, probe.tier, &raw);
        }

        if let Some(value) = normalize_field(field, &raw, url) {
            signals.resolved_by.insert(field, probe.tier);
            return Some(value);
        }
        trace!("{field:?} from {:?} normalized to nothing for {url}", probe.tier);
    }
    None
}

async fn run_probe<P: RenderPage>(
    page: &P,
    url: &str,
    probe: &FieldProbe,
    field: Field,
    product: Option<&ProductNode>,
) -> Option<String> {
    let outcome = match &probe.source {
        ProbeSource::Structured => return product.and_then(|node| structured_value(node, field)),
        ProbeSource::Text(selector) => page.text_content(selector).await,
        ProbeSource::Attribute {
            selector,
            attribute,
        } => page.attribute(selector, attribute).await,
    };

    match outcome {
        Ok(value) => value,
        Err(e) => {
            trace!("{field:?} probe {:?} failed for {url}: {e}", probe.source);
            None
        }
    }
}

fn structured_value(node: &ProductNode, field: Field) -> Option<String> {
    match field {
        Field::Title => node.name(),
        Field::Price => node.price(),
        Field::Image => node.first_image(),
        Field::Description => node.description(),
    }
}
