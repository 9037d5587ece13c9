//! Invoice module.
//!
//! Contains line items, the line table, and total aggregation.

mod line_item;
mod table;
mod totals;

pub use line_item::{parse_quantity, LineItem, StagedEntry, MIN_QUANTITY, MIN_RATE_CENTS};
pub use table::LineTable;
pub use totals::{InvoiceConsumer, InvoiceTotals, RecordingConsumer, TotalAggregator};
