//! The invoice editing session.
//!
//! `InvoiceEditor` owns every piece of session state and is the only way to
//! change it. Each operation runs to completion; any change to the line table
//! marks the aggregator dirty, and the operation flushes it before returning,
//! so the consumer has seen the new totals before the next event arrives.

use crate::catalog::{CatalogCache, CatalogItem, CatalogSource, CatalogStatus};
use crate::error::BillingError;
use crate::ids::ItemId;
use crate::invoice::{InvoiceConsumer, InvoiceTotals, LineItem, LineTable, StagedEntry, TotalAggregator};
use crate::money::Currency;
use crate::search::SearchState;
use crate::staging::SelectionStaging;

/// An external event the editor reacts to.
#[derive(Debug, Clone)]
pub enum EditorEvent {
    /// The search box text changed.
    QueryChanged(String),
    /// The search box gained focus.
    Focus,
    /// The search box lost focus.
    Blur,
    /// A suggestion was picked by its position in the list.
    SelectCandidate(usize),
    /// A catalog item was picked by id.
    Select(ItemId),
    /// The staged items should be added to the invoice.
    Commit,
    /// A row's quantity field was edited.
    SetQuantity { row: usize, input: String },
    /// A row's rate field was edited.
    SetRate { row: usize, input: String },
    /// A row's remove action was used.
    Remove { row: usize },
    /// A catalog fetch finished.
    CatalogLoaded(Result<Vec<CatalogItem>, BillingError>),
}

/// One operator's invoice session.
pub struct InvoiceEditor {
    catalog: CatalogCache,
    search: SearchState,
    staging: SelectionStaging,
    table: LineTable,
    aggregator: TotalAggregator,
    consumer: Box<dyn InvoiceConsumer>,
}

impl InvoiceEditor {
    /// Create an editor and publish the empty invoice to `consumer`.
    pub fn new(currency: Currency, consumer: impl InvoiceConsumer + 'static) -> Self {
        let mut editor = Self {
            catalog: CatalogCache::new(),
            search: SearchState::new(),
            staging: SelectionStaging::new(),
            table: LineTable::new(currency),
            aggregator: TotalAggregator::new(),
            consumer: Box::new(consumer),
        };
        editor.publish();
        editor
    }

    /// Load the catalog. Search only yields matches once this has succeeded.
    pub async fn init(&mut self, source: &dyn CatalogSource) -> CatalogStatus {
        self.catalog.load(source).await.clone()
    }

    /// Dispatch an event to the matching operation.
    pub fn handle(&mut self, event: EditorEvent) -> Result<(), BillingError> {
        match event {
            EditorEvent::QueryChanged(query) => self.input(query),
            EditorEvent::Focus => self.search.focus(),
            EditorEvent::Blur => self.search.blur(),
            EditorEvent::SelectCandidate(index) => {
                self.select_candidate(index)?;
            }
            EditorEvent::Select(id) => {
                self.select(&id)?;
            }
            EditorEvent::Commit => {
                self.commit()?;
            }
            EditorEvent::SetQuantity { row, input } => self.set_quantity(row, &input)?,
            EditorEvent::SetRate { row, input } => self.set_rate(row, &input)?,
            EditorEvent::Remove { row } => {
                self.remove_at(row)?;
            }
            EditorEvent::CatalogLoaded(result) => {
                self.catalog.apply(result);
            }
        }
        Ok(())
    }

    /// Update the search text and suggestions.
    pub fn input(&mut self, query: impl Into<String>) {
        self.search.input(query, self.catalog.items());
    }

    /// Stage the suggestion at `index` of the current list.
    pub fn select_candidate(&mut self, index: usize) -> Result<bool, BillingError> {
        let item = self
            .search
            .candidate(index)
            .cloned()
            .ok_or_else(|| BillingError::ItemNotFound(format!("suggestion #{}", index)))?;
        self.stage(&item)
    }

    /// Stage the catalog item with `id`.
    pub fn select(&mut self, id: &ItemId) -> Result<bool, BillingError> {
        let item = self
            .catalog
            .lookup(id)
            .cloned()
            .ok_or_else(|| BillingError::ItemNotFound(id.to_string()))?;
        self.stage(&item)
    }

    /// Stage `item` and close the suggestion list.
    ///
    /// The search box is left showing the picked description. Returns
    /// `false` when the item was already staged. An item priced in another
    /// currency than the invoice is rejected and nothing changes.
    pub fn stage(&mut self, item: &CatalogItem) -> Result<bool, BillingError> {
        if let Err(e) = self.table.check_currency(item.rate) {
            tracing::warn!(item = %item.id, error = %e, "Rejected item in foreign currency");
            return Err(e);
        }
        self.search.set_placeholder(item.description.clone());
        Ok(self.staging.stage(item))
    }

    /// Move every staged entry to the end of the line table and reset search
    /// and staging. Returns the committed entries.
    ///
    /// If the rows cannot be added (the invoice total would overflow), the
    /// table, staging and search are left as they were.
    pub fn commit(&mut self) -> Result<Vec<StagedEntry>, BillingError> {
        if let Err(e) = self.table.append(self.staging.entries().iter().cloned()) {
            tracing::warn!(staged = self.staging.len(), error = %e, "Commit rejected");
            return Err(e);
        }
        let entries = self.staging.take();
        self.search.clear();
        tracing::info!(
            committed = entries.len(),
            rows = self.table.len(),
            "Committed staged items"
        );
        self.aggregator.mark_dirty();
        self.publish();
        Ok(entries)
    }

    /// Apply typed quantity text to a row.
    ///
    /// Rejected input leaves the row unchanged and publishes nothing.
    pub fn set_quantity(&mut self, row: usize, input: &str) -> Result<(), BillingError> {
        let result = self.table.set_quantity_input(row, input);
        self.after_edit(row, result)
    }

    /// Apply typed rate text to a row.
    ///
    /// Rejected input leaves the row unchanged and publishes nothing.
    pub fn set_rate(&mut self, row: usize, input: &str) -> Result<(), BillingError> {
        let result = self.table.set_rate_input(row, input);
        self.after_edit(row, result)
    }

    /// Remove a row; later rows move up.
    pub fn remove_at(&mut self, row: usize) -> Result<LineItem, BillingError> {
        let removed = self.table.remove_at(row)?;
        self.aggregator.mark_dirty();
        self.publish();
        Ok(removed)
    }

    pub fn catalog(&self) -> &CatalogCache {
        &self.catalog
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn staging(&self) -> &SelectionStaging {
        &self.staging
    }

    pub fn table(&self) -> &LineTable {
        &self.table
    }

    /// Totals as last published.
    pub fn totals(&self) -> Option<&InvoiceTotals> {
        self.aggregator.last()
    }

    fn after_edit(&mut self, row: usize, result: Result<(), BillingError>) -> Result<(), BillingError> {
        match result {
            Ok(()) => {
                self.aggregator.mark_dirty();
                self.publish();
                Ok(())
            }
            Err(e) => {
                if !matches!(e, BillingError::RowOutOfRange { .. }) {
                    tracing::warn!(row, error = %e, "Rejected line edit");
                }
                Err(e)
            }
        }
    }

    fn publish(&mut self) {
        if let Err(e) = self.aggregator.flush(&self.table, self.consumer.as_mut()) {
            tracing::error!(error = %e, "Failed to recompute invoice totals");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticSource;
    use crate::invoice::RecordingConsumer;
    use crate::money::Money;

    fn catalog() -> Vec<CatalogItem> {
        vec![
            CatalogItem::new("1", "Widget", "M", Money::new(250, Currency::USD)),
            CatalogItem::new("2", "Gadget", "L", Money::new(400, Currency::USD)),
        ]
    }

    async fn editor() -> (InvoiceEditor, RecordingConsumer) {
        let consumer = RecordingConsumer::new();
        let mut editor = InvoiceEditor::new(Currency::USD, consumer.clone());
        editor.init(&StaticSource::new(catalog())).await;
        (editor, consumer)
    }

    #[tokio::test]
    async fn test_new_publishes_empty_invoice() {
        let (editor, consumer) = editor().await;
        assert_eq!(consumer.count(), 1);
        assert!(editor.totals().unwrap().total.is_zero());
    }

    #[tokio::test]
    async fn test_stage_sets_placeholder() {
        let (mut editor, _) = editor().await;
        editor.input("gad");
        assert!(editor.search().visible);

        assert!(editor.select_candidate(0).unwrap());
        assert_eq!(editor.search().query, "Gadget");
        assert!(!editor.search().visible);
        assert!(editor.search().candidates.is_empty());
    }

    #[tokio::test]
    async fn test_staging_does_not_publish() {
        let (mut editor, consumer) = editor().await;
        editor.select(&ItemId::new("1")).unwrap();
        assert_eq!(consumer.count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_item() {
        let (mut editor, _) = editor().await;
        let err = editor.select(&ItemId::new("99")).unwrap_err();
        assert!(matches!(err, BillingError::ItemNotFound(_)));
        assert!(editor.select_candidate(0).is_err());
    }

    #[tokio::test]
    async fn test_empty_commit_still_publishes() {
        let (mut editor, consumer) = editor().await;
        assert!(editor.commit().unwrap().is_empty());
        assert!(editor.table().is_empty());
        assert_eq!(consumer.count(), 2);
    }

    #[tokio::test]
    async fn test_rejected_edit_publishes_nothing() {
        let (mut editor, consumer) = editor().await;
        editor.select(&ItemId::new("1")).unwrap();
        editor.commit().unwrap();
        let count = consumer.count();

        assert!(editor.set_quantity(0, "lots").is_err());
        assert!(editor.set_rate(0, "").is_err());
        assert!(editor.remove_at(5).is_err());
        assert_eq!(consumer.count(), count);
        assert_eq!(editor.table().get(0).unwrap().total_rate().amount_cents, 250);
    }

    #[tokio::test]
    async fn test_events_drive_the_same_operations() {
        let (mut editor, consumer) = editor().await;
        let events = vec![
            EditorEvent::Focus,
            EditorEvent::QueryChanged("wid".into()),
            EditorEvent::SelectCandidate(0),
            EditorEvent::Select(ItemId::new("2")),
            EditorEvent::Commit,
            EditorEvent::SetQuantity { row: 1, input: "2".into() },
            EditorEvent::SetRate { row: 0, input: "3.00".into() },
        ];
        for event in events {
            editor.handle(event).unwrap();
        }

        let latest = consumer.latest().unwrap();
        assert_eq!(latest.total.amount_cents, 300 + 800);
        assert_eq!(
            latest.descriptions,
            vec![
                "item_description: Widget item_size: M quantity: 1 rate:3.00".to_string(),
                "item_description: Gadget item_size: L quantity: 2 rate:8.00".to_string(),
            ]
        );

        editor.handle(EditorEvent::Remove { row: 0 }).unwrap();
        assert_eq!(consumer.latest().unwrap().total.amount_cents, 800);
    }

    #[tokio::test]
    async fn test_catalog_loaded_event() {
        let consumer = RecordingConsumer::new();
        let mut editor = InvoiceEditor::new(Currency::USD, consumer);
        editor.input("wid");
        assert!(editor.search().candidates.is_empty());

        editor.handle(EditorEvent::CatalogLoaded(Ok(catalog()))).unwrap();
        assert!(editor.catalog().is_ready());

        editor
            .handle(EditorEvent::CatalogLoaded(Err(BillingError::CatalogUnavailable(
                "timeout".into(),
            ))))
            .unwrap();
        assert_eq!(editor.catalog().len(), 2);
    }

    #[tokio::test]
    async fn test_foreign_currency_item_is_not_staged() {
        let consumer = RecordingConsumer::new();
        let mut editor = InvoiceEditor::new(Currency::USD, consumer.clone());
        let euro = CatalogItem::new("7", "Espresso", "S", Money::new(180, Currency::EUR));
        editor.init(&StaticSource::new(vec![euro])).await;

        let err = editor.select(&ItemId::new("7")).unwrap_err();
        assert!(matches!(err, BillingError::CurrencyMismatch { .. }));
        assert!(editor.staging().is_empty());

        editor.commit().unwrap();
        assert!(editor.table().is_empty());
        assert_eq!(consumer.count(), 2);
        assert!(consumer.latest().unwrap().total.is_zero());
    }

    #[tokio::test]
    async fn test_overflowing_edit_is_rejected_and_total_stays_current() {
        let consumer = RecordingConsumer::new();
        let mut editor = InvoiceEditor::new(Currency::USD, consumer.clone());
        editor
            .init(&StaticSource::new(vec![
                CatalogItem::new("1", "Washer", "S", Money::new(1, Currency::USD)),
                CatalogItem::new("2", "Shim", "S", Money::new(1, Currency::USD)),
            ]))
            .await;
        editor.select(&ItemId::new("1")).unwrap();
        editor.select(&ItemId::new("2")).unwrap();
        editor.commit().unwrap();
        let count = consumer.count();

        let err = editor.set_quantity(0, &i64::MAX.to_string()).unwrap_err();
        assert_eq!(err, BillingError::Overflow);
        assert_eq!(editor.table().get(0).unwrap().quantity(), 1);
        assert_eq!(consumer.count(), count);
        assert_eq!(consumer.latest().unwrap().total.amount_cents, 2);
        assert_eq!(editor.totals().unwrap().total, editor.table().subtotal().unwrap());
    }

    #[tokio::test]
    async fn test_overflowing_commit_keeps_staging() {
        let consumer = RecordingConsumer::new();
        let mut editor = InvoiceEditor::new(Currency::USD, consumer.clone());
        editor
            .init(&StaticSource::new(vec![
                CatalogItem::new("1", "Crane", "XL", Money::new(i64::MAX, Currency::USD)),
                CatalogItem::new("2", "Bolt", "S", Money::new(1, Currency::USD)),
            ]))
            .await;
        editor.select(&ItemId::new("1")).unwrap();
        editor.select(&ItemId::new("2")).unwrap();

        assert_eq!(editor.commit().unwrap_err(), BillingError::Overflow);
        assert!(editor.table().is_empty());
        assert_eq!(editor.staging().len(), 2);
        assert_eq!(consumer.count(), 1);
    }
}
