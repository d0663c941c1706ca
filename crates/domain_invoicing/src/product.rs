//! Product catalog entries
//!
//! Picking a product on an invoice row copies its name, unit, default price
//! and VAT rate into the row; later catalog changes do not touch existing
//! invoices.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::ProductId;

use crate::invoice::NewInvoiceItem;

/// Standard Serbian VAT rate
pub const STANDARD_VAT_RATE: Decimal = dec!(20);

/// A product in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Packaging unit, e.g. `0.75`
    pub unit: String,
    /// Suggested unit price, VAT excluded
    pub default_price: Option<Decimal>,
    /// VAT rate percentage
    pub vat_rate: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Creates a product with the standard VAT rate and no default price
    pub fn new(name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            id: ProductId::new_v7(),
            name: name.into(),
            unit: unit.into(),
            default_price: None,
            vat_rate: STANDARD_VAT_RATE,
            created_at: Utc::now(),
        }
    }

    pub fn with_default_price(mut self, price: Decimal) -> Self {
        self.default_price = Some(price);
        self
    }

    pub fn with_vat_rate(mut self, vat_rate: Decimal) -> Self {
        self.vat_rate = vat_rate;
        self
    }

    /// Pre-fills an invoice row for this product
    ///
    /// A product without a default price yields a zero unit price.
    pub fn to_item(&self, quantity: Decimal) -> NewInvoiceItem {
        NewInvoiceItem {
            product_id: Some(self.id),
            product_name: self.name.clone(),
            quantity,
            unit: self.unit.clone(),
            unit_price: self.default_price.unwrap_or(Decimal::ZERO),
            discount_percent: Decimal::ZERO,
            vat_rate: self.vat_rate,
        }
    }
}
