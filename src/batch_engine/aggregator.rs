//! Index-addressed result collection
//!
//! Pipelines finish in render order, not request order. Each outcome is
//! written into the slot of the URL it belongs to, and the response is
//! read out of the slots in index order.

use log::warn;

use crate::page_extractor::schema::{BatchResponse, ProductRecord};
use crate::render_session::PageError;

/// One slot per requested URL
#[derive(Debug, Clone)]
pub struct ResultSlots {
    urls: Vec<String>,
    slots: Vec<Option<ProductRecord>>,
}

impl ResultSlots {
    #[must_use]
    pub fn new(urls: &[String]) -> Self {
        Self {
            urls: urls.to_vec(),
            slots: vec![None; urls.len()],
        }
    }

    /// Store the outcome for `index`
    ///
    /// Out-of-range and duplicate writes are dropped with a warning; the
    /// first outcome for an index wins.
    pub fn fill(&mut self, index: usize, record: ProductRecord) {
        match self.slots.get_mut(index) {
            Some(slot) if slot.is_none() => *slot = Some(record),
            Some(_) => warn!("Duplicate outcome for index {index} ignored"),
            None => warn!("Outcome for out-of-range index {index} ignored"),
        }
    }

    #[must_use]
    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Produce the response, standing in `missing` for any empty slot
    #[must_use]
    pub fn into_response(self, missing: &PageError) -> BatchResponse {
        let results = self
            .slots
            .into_iter()
            .zip(self.urls)
            .map(|(slot, url)| slot.unwrap_or_else(|| ProductRecord::failed(url, missing.to_string())))
            .collect();
        BatchResponse { results }
    }
}
