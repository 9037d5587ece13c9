//! Aggregate totals and the consumer they are pushed to.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use crate::error::BillingError;
use crate::invoice::LineTable;
use crate::money::Money;

/// Receives the invoice totals every time the line table changes.
///
/// Both methods are called together, total first, on every recomputation,
/// including once for the initial empty table.
pub trait InvoiceConsumer {
    fn on_total_changed(&mut self, total: Money);

    fn on_line_descriptions_changed(&mut self, descriptions: &[String]);
}

/// Totals derived from a line table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InvoiceTotals {
    /// Sum of every row's `rate * quantity`.
    pub total: Money,
    /// One summary line per row, in table order.
    pub descriptions: Vec<String>,
}

impl InvoiceTotals {
    /// Recompute from scratch.
    pub fn compute(table: &LineTable) -> Result<Self, BillingError> {
        Ok(Self {
            total: table.subtotal()?,
            descriptions: table.rows().iter().map(|row| row.description_line()).collect(),
        })
    }
}

/// Recomputes and publishes totals after line table changes.
///
/// Mutations only mark the aggregator dirty; `flush` does the full
/// recomputation once and notifies the consumer.
#[derive(Debug)]
pub struct TotalAggregator {
    dirty: bool,
    last: Option<InvoiceTotals>,
}

impl TotalAggregator {
    /// A fresh aggregator starts dirty so the empty state gets published.
    pub fn new() -> Self {
        Self {
            dirty: true,
            last: None,
        }
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Totals from the most recent publish.
    pub fn last(&self) -> Option<&InvoiceTotals> {
        self.last.as_ref()
    }

    /// Publish if anything changed since the last flush.
    ///
    /// Returns whether the consumer was notified.
    pub fn flush(
        &mut self,
        table: &LineTable,
        consumer: &mut dyn InvoiceConsumer,
    ) -> Result<bool, BillingError> {
        if !self.dirty {
            return Ok(false);
        }
        let totals = InvoiceTotals::compute(table)?;
        self.dirty = false;

        tracing::debug!(
            total = %totals.total,
            rows = totals.descriptions.len(),
            "Publishing invoice totals"
        );
        consumer.on_total_changed(totals.total);
        consumer.on_line_descriptions_changed(&totals.descriptions);
        self.last = Some(totals);
        Ok(true)
    }
}

impl Default for TotalAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// A consumer that records every notification, for tests and replays.
///
/// Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingConsumer {
    log: Rc<RefCell<Vec<InvoiceTotals>>>,
    pending_total: Option<Money>,
}

impl RecordingConsumer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `(total, descriptions)` pair received so far.
    pub fn notifications(&self) -> Vec<InvoiceTotals> {
        self.log.borrow().clone()
    }

    pub fn latest(&self) -> Option<InvoiceTotals> {
        self.log.borrow().last().cloned()
    }

    pub fn count(&self) -> usize {
        self.log.borrow().len()
    }
}

impl InvoiceConsumer for RecordingConsumer {
    fn on_total_changed(&mut self, total: Money) {
        self.pending_total = Some(total);
    }

    fn on_line_descriptions_changed(&mut self, descriptions: &[String]) {
        if let Some(total) = self.pending_total.take() {
            self.log.borrow_mut().push(InvoiceTotals {
                total,
                descriptions: descriptions.to_vec(),
            });
        }
    }
}
