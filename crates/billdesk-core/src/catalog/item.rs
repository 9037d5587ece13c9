//! Catalog item and its wire record.

use crate::error::BillingError;
use crate::ids::ItemId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// A billable item from the catalog. Never mutated once loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogItem {
    /// Unique item identifier.
    pub id: ItemId,
    /// Item description, the searchable text.
    pub description: String,
    /// Item size label (e.g., "M", "500ml").
    pub size: String,
    /// Price per unit.
    pub rate: Money,
}

impl CatalogItem {
    /// Create a new catalog item.
    pub fn new(
        id: impl Into<ItemId>,
        description: impl Into<String>,
        size: impl Into<String>,
        rate: Money,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            size: size.into(),
            rate,
        }
    }
}

/// A rate as it arrives on the wire: numeric columns may be encoded as text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawRate {
    Number(serde_json::Number),
    Text(String),
}

impl RawRate {
    fn to_money(&self, currency: Currency) -> Result<Money, BillingError> {
        match self {
            RawRate::Number(n) => Money::parse(&n.to_string(), currency),
            RawRate::Text(s) => Money::parse(s, currency),
        }
    }
}

/// A catalog row as served by the bill items endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogRecord {
    pub id: ItemId,
    #[serde(alias = "description")]
    pub item_description: String,
    #[serde(alias = "size", default)]
    pub item_size: String,
    pub rate: RawRate,
}

impl CatalogRecord {
    /// Convert into a catalog item, validating that the rate is positive.
    pub fn into_item(self, currency: Currency) -> Result<CatalogItem, BillingError> {
        let rate = self.rate.to_money(currency)?;
        if !rate.is_positive() {
            return Err(BillingError::InvalidRate(rate.display_amount()));
        }
        Ok(CatalogItem {
            id: self.id,
            description: self.item_description,
            size: self.item_size,
            rate,
        })
    }
}

/// Response body of a catalog fetch: `{"rows": [...]}` or a bare array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CatalogPayload {
    Rows { rows: Vec<CatalogRecord> },
    List(Vec<CatalogRecord>),
}

impl CatalogPayload {
    /// Parse a JSON body.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, BillingError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Convert every record, skipping the ones with unusable rates.
    pub fn into_items(self, currency: Currency) -> Vec<CatalogItem> {
        let records = match self {
            CatalogPayload::Rows { rows } => rows,
            CatalogPayload::List(list) => list,
        };

        records
            .into_iter()
            .filter_map(|record| {
                let id = record.id.clone();
                match record.into_item(currency) {
                    Ok(item) => Some(item),
                    Err(e) => {
                        tracing::warn!(item_id = %id, error = %e, "Skipping catalog record");
                        None
                    }
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_envelope_with_text_rates() {
        let body = br#"{"rows": [
            {"id": 1, "item_description": "Widget", "item_size": "M", "rate": "2.50"},
            {"id": 2, "item_description": "Gadget", "item_size": "L", "rate": 4}
        ]}"#;

        let items = CatalogPayload::from_slice(body).unwrap().into_items(Currency::USD);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, ItemId::new("1"));
        assert_eq!(items[0].rate.amount_cents, 250);
        assert_eq!(items[1].rate.amount_cents, 400);
    }

    #[test]
    fn test_bare_array_with_aliases() {
        let body = br#"[{"id": "a", "description": "Bolt", "size": "5mm", "rate": 0.25}]"#;

        let items = CatalogPayload::from_slice(body).unwrap().into_items(Currency::USD);
        assert_eq!(items[0].description, "Bolt");
        assert_eq!(items[0].size, "5mm");
        assert_eq!(items[0].rate.amount_cents, 25);
    }

    #[test]
    fn test_unusable_rates_are_skipped() {
        let body = br#"[
            {"id": 1, "item_description": "Free", "rate": 0},
            {"id": 2, "item_description": "Broken", "rate": "n/a"},
            {"id": 3, "item_description": "Kept", "rate": "1.00"}
        ]"#;

        let items = CatalogPayload::from_slice(body).unwrap().into_items(Currency::USD);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].description, "Kept");
    }

    #[test]
    fn test_malformed_body() {
        assert!(CatalogPayload::from_slice(b"{\"rows\": 3}").is_err());
    }
}
