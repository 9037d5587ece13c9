//! Invoice line items.

use crate::catalog::CatalogItem;
use crate::error::BillingError;
use crate::ids::ItemId;
use crate::money::Money;
use serde::Serialize;

/// Smallest quantity a row may carry.
pub const MIN_QUANTITY: i64 = 1;

/// Smallest rate a row may carry, in minor units (0.01).
pub const MIN_RATE_CENTS: i64 = 1;

/// A row of the invoice.
///
/// `total_rate` is derived: every change to `quantity` or `rate` goes through
/// a setter that recomputes it, so it always equals `rate * quantity`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LineItem {
    id: ItemId,
    description: String,
    size: String,
    quantity: i64,
    rate: Money,
    total_rate: Money,
}

/// A line item that has been picked but not yet added to the table.
pub type StagedEntry = LineItem;

impl LineItem {
    /// Start a row from a catalog item: one unit at the catalog rate.
    pub fn from_catalog(item: &CatalogItem) -> Self {
        Self {
            id: item.id.clone(),
            description: item.description.clone(),
            size: item.size.clone(),
            quantity: MIN_QUANTITY,
            rate: item.rate,
            total_rate: item.rate,
        }
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn size(&self) -> &str {
        &self.size
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn rate(&self) -> Money {
        self.rate
    }

    /// `rate * quantity`.
    pub fn total_rate(&self) -> Money {
        self.total_rate
    }

    /// Replace the quantity and recompute the total.
    ///
    /// On error the row is left untouched.
    pub fn set_quantity(&mut self, quantity: i64) -> Result<(), BillingError> {
        if quantity < MIN_QUANTITY {
            return Err(BillingError::InvalidQuantity(quantity.to_string()));
        }
        let total_rate = self.rate.try_multiply(quantity).ok_or(BillingError::Overflow)?;
        self.quantity = quantity;
        self.total_rate = total_rate;
        Ok(())
    }

    /// Replace the rate and recompute the total.
    ///
    /// On error the row is left untouched.
    pub fn set_rate(&mut self, rate: Money) -> Result<(), BillingError> {
        if rate.currency != self.rate.currency {
            return Err(BillingError::CurrencyMismatch {
                expected: self.rate.currency.code().to_string(),
                got: rate.currency.code().to_string(),
            });
        }
        if rate.amount_cents < MIN_RATE_CENTS {
            return Err(BillingError::InvalidRate(rate.display_amount()));
        }
        let total_rate = rate.try_multiply(self.quantity).ok_or(BillingError::Overflow)?;
        self.rate = rate;
        self.total_rate = total_rate;
        Ok(())
    }

    /// Parse operator text as a quantity and apply it.
    pub fn set_quantity_input(&mut self, input: &str) -> Result<(), BillingError> {
        let quantity = parse_quantity(input)?;
        self.set_quantity(quantity)
    }

    /// Parse operator text as a rate in this row's currency and apply it.
    pub fn set_rate_input(&mut self, input: &str) -> Result<(), BillingError> {
        let rate = Money::parse(input, self.rate.currency)
            .map_err(|_| BillingError::InvalidRate(input.to_string()))?;
        self.set_rate(rate)
    }

    /// Summary line handed to the invoice consumer.
    pub fn description_line(&self) -> String {
        format!(
            "item_description: {} item_size: {} quantity: {} rate:{}",
            self.description,
            self.size,
            self.quantity,
            self.total_rate.display_amount()
        )
    }
}

/// Parse a whole-number quantity.
pub fn parse_quantity(input: &str) -> Result<i64, BillingError> {
    input
        .trim()
        .parse::<i64>()
        .map_err(|_| BillingError::InvalidQuantity(input.to_string()))
}
