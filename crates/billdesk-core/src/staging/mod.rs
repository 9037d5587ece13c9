//! Selection staging.
//!
//! Items picked from the suggestion list wait here until the operator adds
//! them to the invoice. Each catalog item appears at most once.

use serde::Serialize;

use crate::catalog::CatalogItem;
use crate::ids::ItemId;
use crate::invoice::StagedEntry;

/// Picked, not yet committed, items in pick order.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SelectionStaging {
    entries: Vec<StagedEntry>,
}

impl SelectionStaging {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage `item` at one unit and the catalog rate.
    ///
    /// Returns `false` when an entry with the same id is already staged; the
    /// existing entry is left as it was.
    pub fn stage(&mut self, item: &CatalogItem) -> bool {
        if self.contains(&item.id) {
            tracing::debug!(item_id = %item.id, "Item already staged");
            return false;
        }
        self.entries.push(StagedEntry::from_catalog(item));
        true
    }

    /// Hand over every staged entry in pick order, leaving staging empty.
    pub fn take(&mut self) -> Vec<StagedEntry> {
        std::mem::take(&mut self.entries)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.entries.iter().any(|entry| entry.id() == id)
    }

    pub fn entries(&self) -> &[StagedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Comma-separated descriptions of the staged items.
    pub fn summary(&self) -> String {
        self.entries
            .iter()
            .map(|entry| entry.description())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
