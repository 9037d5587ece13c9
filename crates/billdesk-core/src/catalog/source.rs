//! The catalog source seam.

use async_trait::async_trait;

use crate::catalog::CatalogItem;
use crate::error::BillingError;

/// Where the catalog comes from.
///
/// Implementations perform a single read and return the full, ordered list
/// of billable items. They must not panic on failure: the cache turns any
/// error into a logged, recoverable state.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Short name for logs (e.g., a URL or a file path).
    fn name(&self) -> &str;

    /// Fetch the whole catalog.
    async fn fetch_catalog(&self) -> Result<Vec<CatalogItem>, BillingError>;
}

/// A source backed by an in-memory list. Useful for tests and demos.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    items: Vec<CatalogItem>,
}

impl StaticSource {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }
}

#[async_trait]
impl CatalogSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_catalog(&self) -> Result<Vec<CatalogItem>, BillingError> {
        Ok(self.items.clone())
    }
}
