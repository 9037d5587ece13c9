//! Invoice line-state engine for billdesk.
//!
//! This crate provides the state behind an invoice entry screen:
//!
//! - **Catalog**: billable items, the source seam, a one-shot cache
//! - **Search**: case-insensitive substring suggestions
//! - **Staging**: picked items waiting to be added, unique by id
//! - **Invoice**: the line table, per-row edits, aggregate totals
//! - **Editor**: the session that ties them together and notifies a consumer
//!
//! # Example
//!
//! ```rust,ignore
//! use billdesk_core::prelude::*;
//!
//! let mut editor = InvoiceEditor::new(Currency::USD, RecordingConsumer::new());
//! editor.init(&source).await;
//!
//! editor.input("wid");
//! editor.select_candidate(0)?;
//! editor.commit()?;
//! editor.set_quantity(0, "3")?;
//!
//! println!("Total: {}", editor.totals().unwrap().total);
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod catalog;
pub mod editor;
pub mod invoice;
pub mod search;
pub mod staging;

pub use error::BillingError;
pub use ids::ItemId;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::BillingError;
    pub use crate::ids::ItemId;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{CatalogCache, CatalogItem, CatalogSource, CatalogStatus, StaticSource};

    // Search and staging
    pub use crate::search::SearchState;
    pub use crate::staging::SelectionStaging;

    // Invoice
    pub use crate::invoice::{
        InvoiceConsumer, InvoiceTotals, LineItem, LineTable, RecordingConsumer, StagedEntry,
        TotalAggregator,
    };

    // Editor
    pub use crate::editor::{EditorEvent, InvoiceEditor};
}
