//! Catalog module.
//!
//! Contains catalog items, the source seam, and the one-shot cache.

mod cache;
mod item;
mod source;

pub use cache::{CatalogCache, CatalogStatus};
pub use item::{CatalogItem, CatalogPayload, CatalogRecord, RawRate};
pub use source::{CatalogSource, StaticSource};
