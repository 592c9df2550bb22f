//! Listing extraction
//!
//! Turns a ready page into a `ProductRecord` by resolving each field through
//! structured data, then meta tags, then the DOM.

pub mod availability;
pub mod extractors;
pub mod normalize;
pub mod probes;
pub mod schema;
pub mod structured_data;

pub use availability::classify_availability;
pub use extractors::{Extraction, extract};
pub use probes::{ExtractionPlan, ExtractionSelectors, FieldProbe, ProbeSource};
pub use schema::{
    BatchResponse, ErrorResponse, Field, ItemStatus, ProductRecord, RawSignals, Tier,
};
pub use structured_data::ProductNode;
