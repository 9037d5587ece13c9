//! One-shot catalog cache.

use std::sync::Arc;

use serde::Serialize;

use crate::catalog::{CatalogItem, CatalogSource};
use crate::error::BillingError;
use crate::ids::ItemId;

/// Lifecycle of the catalog load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum CatalogStatus {
    /// No load has completed yet.
    Pending,
    /// The last load succeeded with this many items.
    Ready { items: usize },
    /// The last load failed; the catalog kept its previous contents.
    Failed { reason: String },
}

/// Read-only catalog loaded once at startup.
///
/// The item list is held behind an `Arc<[CatalogItem]>` and replaced in a
/// single assignment, so a reader either sees the old list or the new one.
#[derive(Debug, Clone)]
pub struct CatalogCache {
    items: Arc<[CatalogItem]>,
    status: CatalogStatus,
}

impl CatalogCache {
    /// Create an empty cache in the pending state.
    pub fn new() -> Self {
        Self {
            items: Arc::from(Vec::new()),
            status: CatalogStatus::Pending,
        }
    }

    /// Fetch from `source` and apply the outcome.
    pub async fn load(&mut self, source: &dyn CatalogSource) -> &CatalogStatus {
        tracing::info!(source = source.name(), "Loading catalog");
        let result = source.fetch_catalog().await;
        self.apply(result)
    }

    /// Apply the result of a fetch performed elsewhere.
    ///
    /// On failure the current items are kept and the error is logged.
    pub fn apply(&mut self, result: Result<Vec<CatalogItem>, BillingError>) -> &CatalogStatus {
        match result {
            Ok(items) => self.replace(items),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    kept_items = self.items.len(),
                    "Catalog load failed, keeping previous catalog"
                );
                self.status = CatalogStatus::Failed {
                    reason: e.to_string(),
                };
            }
        }
        &self.status
    }

    /// Swap in a new item list.
    pub fn replace(&mut self, items: Vec<CatalogItem>) {
        let count = items.len();
        self.items = Arc::from(items);
        self.status = CatalogStatus::Ready { items: count };
        tracing::info!(items = count, "Catalog ready");
    }

    /// Current load status.
    pub fn status(&self) -> &CatalogStatus {
        &self.status
    }

    /// Whether a load has succeeded.
    pub fn is_ready(&self) -> bool {
        matches!(self.status, CatalogStatus::Ready { .. })
    }

    /// Shared handle to the current item list.
    pub fn snapshot(&self) -> Arc<[CatalogItem]> {
        Arc::clone(&self.items)
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Find an item by id.
    pub fn lookup(&self, id: &ItemId) -> Option<&CatalogItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new()
    }
}
