//! Billing error types.

use thiserror::Error;

/// Errors that can occur while building an invoice.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BillingError {
    /// Catalog item not found.
    #[error("Catalog item not found: {0}")]
    ItemNotFound(String),

    /// Row index outside the current line table.
    #[error("Row {index} is out of range (table has {len} rows)")]
    RowOutOfRange { index: usize, len: usize },

    /// Quantity input that is not a whole number >= 1.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Rate input that is not a decimal >= the minimum rate.
    #[error("Invalid rate: {0}")]
    InvalidRate(String),

    /// Decimal text that cannot be read as money.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Unknown currency code.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// The catalog source failed or timed out.
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for BillingError {
    fn from(e: serde_json::Error) -> Self {
        BillingError::SerializationError(e.to_string())
    }
}
