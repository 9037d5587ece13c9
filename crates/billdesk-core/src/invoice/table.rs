//! The committed line table.

use crate::error::BillingError;
use crate::invoice::LineItem;
use crate::money::{Currency, Money};
use serde::Serialize;

/// Ordered invoice rows, in commit order.
///
/// Rows are addressed by their current position. A position outside the
/// table is a caller bug: it is logged at error level and rejected without
/// touching any row.
///
/// Every accepted change leaves a table whose subtotal can be computed:
/// rows in another currency, and appends or edits that would overflow the
/// sum, are rejected and rolled back.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LineTable {
    rows: Vec<LineItem>,
    currency: Currency,
}

impl LineTable {
    pub fn new(currency: Currency) -> Self {
        Self {
            rows: Vec::new(),
            currency,
        }
    }

    /// Append rows at the end, keeping their order.
    ///
    /// All or nothing: on error the table is unchanged.
    pub fn append(&mut self, rows: impl IntoIterator<Item = LineItem>) -> Result<usize, BillingError> {
        let before = self.rows.len();
        for row in rows {
            if let Err(e) = self.check_currency(row.rate()) {
                self.rows.truncate(before);
                return Err(e);
            }
            self.rows.push(row);
        }
        if let Err(e) = self.subtotal() {
            self.rows.truncate(before);
            return Err(e);
        }
        Ok(self.rows.len() - before)
    }

    /// Remove the row at `index`; later rows shift down by one.
    pub fn remove_at(&mut self, index: usize) -> Result<LineItem, BillingError> {
        self.check_index(index)?;
        Ok(self.rows.remove(index))
    }

    pub fn set_quantity(&mut self, index: usize, quantity: i64) -> Result<(), BillingError> {
        self.edit_row(index, |row| row.set_quantity(quantity))
    }

    pub fn set_quantity_input(&mut self, index: usize, input: &str) -> Result<(), BillingError> {
        self.edit_row(index, |row| row.set_quantity_input(input))
    }

    pub fn set_rate(&mut self, index: usize, rate: Money) -> Result<(), BillingError> {
        self.edit_row(index, |row| row.set_rate(rate))
    }

    pub fn set_rate_input(&mut self, index: usize, input: &str) -> Result<(), BillingError> {
        self.edit_row(index, |row| row.set_rate_input(input))
    }

    pub fn rows(&self) -> &[LineItem] {
        &self.rows
    }

    pub fn get(&self, index: usize) -> Option<&LineItem> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Sum of every row's total.
    pub fn subtotal(&self) -> Result<Money, BillingError> {
        Money::try_sum(self.rows.iter().map(LineItem::total_rate), self.currency)
            .ok_or(BillingError::Overflow)
    }

    /// Reject money that is not in the table's currency.
    pub fn check_currency(&self, money: Money) -> Result<(), BillingError> {
        if money.currency != self.currency {
            return Err(BillingError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: money.currency.code().to_string(),
            });
        }
        Ok(())
    }

    /// Apply `edit` to one row, restoring it if the table total would no
    /// longer fit.
    fn edit_row(
        &mut self,
        index: usize,
        edit: impl FnOnce(&mut LineItem) -> Result<(), BillingError>,
    ) -> Result<(), BillingError> {
        self.check_index(index)?;
        let previous = self.rows[index].clone();
        edit(&mut self.rows[index])?;
        if let Err(e) = self.subtotal() {
            self.rows[index] = previous;
            return Err(e);
        }
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<(), BillingError> {
        if index >= self.rows.len() {
            tracing::error!(index, len = self.rows.len(), "Line table row out of range");
            return Err(BillingError::RowOutOfRange {
                index,
                len: self.rows.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogItem;

    fn row(id: &str, cents: i64) -> LineItem {
        LineItem::from_catalog(&CatalogItem::new(
            id,
            format!("Item {}", id),
            "M",
            Money::new(cents, Currency::USD),
        ))
    }

    fn table() -> LineTable {
        let mut table = LineTable::new(Currency::USD);
        table
            .append(vec![row("a", 100), row("b", 200), row("c", 300)])
            .unwrap();
        table
    }

    fn ids(table: &LineTable) -> Vec<&str> {
        table.rows().iter().map(|r| r.id().as_str()).collect()
    }

    #[test]
    fn test_append_keeps_order() {
        let mut table = table();
        assert_eq!(table.append(vec![row("d", 50)]).unwrap(), 1);
        assert_eq!(ids(&table), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_remove_shifts_rows() {
        let mut table = table();
        let removed = table.remove_at(1).unwrap();
        assert_eq!(removed.id().as_str(), "b");
        assert_eq!(ids(&table), vec!["a", "c"]);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut table = table();
        let before = table.clone();

        assert_eq!(
            table.remove_at(3).unwrap_err(),
            BillingError::RowOutOfRange { index: 3, len: 3 }
        );
        assert!(table.set_quantity(7, 2).is_err());
        assert!(table.set_rate_input(3, "1.00").is_err());
        assert_eq!(table, before);
    }

    #[test]
    fn test_edits_only_touch_their_row() {
        let mut table = table();
        table.set_quantity_input(2, "2").unwrap();
        table.set_rate_input(0, "0.50").unwrap();

        assert_eq!(table.get(0).unwrap().total_rate().amount_cents, 50);
        assert_eq!(table.get(1).unwrap().total_rate().amount_cents, 200);
        assert_eq!(table.get(2).unwrap().total_rate().amount_cents, 600);
    }

    #[test]
    fn test_subtotal() {
        let mut table = table();
        assert_eq!(table.subtotal().unwrap().amount_cents, 600);

        table.set_quantity(1, 5).unwrap();
        assert_eq!(table.subtotal().unwrap().amount_cents, 1400);

        let empty = LineTable::new(Currency::USD);
        assert!(empty.subtotal().unwrap().is_zero());
    }

    #[test]
    fn test_total_invariant_after_every_edit() {
        let mut table = table();
        let edits: Vec<Box<dyn Fn(&mut LineTable) -> Result<(), BillingError>>> = vec![
            Box::new(|t| t.set_quantity(0, 4)),
            Box::new(|t| t.set_rate_input(1, "3.33")),
            Box::new(|t| t.set_quantity_input(2, "x")),
            Box::new(|t| t.remove_at(0).map(|_| ())),
            Box::new(|t| t.set_rate_input(0, "0.01")),
        ];

        for edit in edits {
            let _ = edit(&mut table);
            for row in table.rows() {
                assert_eq!(
                    row.total_rate().amount_cents,
                    row.rate().amount_cents * row.quantity()
                );
            }
        }
    }

    #[test]
    fn test_edit_that_overflows_the_sum_is_rolled_back() {
        let mut table = LineTable::new(Currency::USD);
        table.append(vec![row("a", 1), row("b", 1)]).unwrap();

        // The row alone fits in i64; the table sum does not.
        assert_eq!(table.set_quantity_input(0, &i64::MAX.to_string()), Err(BillingError::Overflow));
        assert_eq!(table.get(0).unwrap().quantity(), 1);
        assert_eq!(table.get(0).unwrap().total_rate().amount_cents, 1);
        assert_eq!(table.subtotal().unwrap().amount_cents, 2);

        assert_eq!(table.set_rate(1, Money::new(i64::MAX, Currency::USD)), Err(BillingError::Overflow));
        assert_eq!(table.get(1).unwrap().rate().amount_cents, 1);
    }

    #[test]
    fn test_append_that_overflows_is_rejected_whole() {
        let mut table = LineTable::new(Currency::USD);
        table.append(vec![row("a", i64::MAX - 10)]).unwrap();

        let err = table.append(vec![row("b", 5), row("c", 20)]).unwrap_err();
        assert_eq!(err, BillingError::Overflow);
        assert_eq!(ids(&table), vec!["a"]);
    }

    #[test]
    fn test_append_rejects_other_currency() {
        let mut table = table();
        let euro = LineItem::from_catalog(&CatalogItem::new(
            "e",
            "Euro item",
            "M",
            Money::new(100, Currency::EUR),
        ));

        let err = table.append(vec![row("d", 50), euro]).unwrap_err();
        assert!(matches!(err, BillingError::CurrencyMismatch { .. }));
        assert_eq!(ids(&table), vec!["a", "b", "c"]);
        assert_eq!(table.subtotal().unwrap().amount_cents, 600);
    }
}
