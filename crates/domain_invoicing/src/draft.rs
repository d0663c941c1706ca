//! Invoice drafts and caller-side validation
//!
//! A draft is what the user is editing before it is saved. Rows without a
//! product name are ignored everywhere (calculation preview, validation and
//! save). Range checks on quantities, prices and percentages live here
//! rather than in the calculation engine.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::{ClientId, Currency};

use crate::calculation::{checked_calculate, InvoiceCalculation, LineItem};
use crate::error::InvoicingError;
use crate::invoice::{InvoiceHeader, InvoiceStatus, NewInvoiceItem, PaymentMethod};
use crate::product::STANDARD_VAT_RATE;

/// Values pre-filled on new invoices and rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceDefaults {
    pub issue_place: String,
    pub traffic_place: String,
    pub payment_method: PaymentMethod,
    pub vat_rate: Decimal,
    pub unit: String,
    pub currency: Currency,
}

impl Default for InvoiceDefaults {
    fn default() -> Self {
        Self {
            issue_place: "Malo Srediste".to_string(),
            traffic_place: "Vrsac".to_string(),
            payment_method: PaymentMethod::BankTransfer,
            vat_rate: STANDARD_VAT_RATE,
            unit: "0.75".to_string(),
            currency: Currency::RSD,
        }
    }
}

impl InvoiceDefaults {
    /// An empty row: one unit, no price, no discount, default VAT
    pub fn blank_item(&self) -> NewInvoiceItem {
        NewInvoiceItem {
            product_id: None,
            product_name: String::new(),
            quantity: Decimal::ONE,
            unit: self.unit.clone(),
            unit_price: Decimal::ZERO,
            discount_percent: Decimal::ZERO,
            vat_rate: self.vat_rate,
        }
    }
}

/// An invoice being edited
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDraft {
    pub client_id: Option<ClientId>,
    pub issue_date: Option<NaiveDate>,
    pub issue_place: String,
    pub traffic_date: Option<NaiveDate>,
    pub traffic_place: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub payment_method: PaymentMethod,
    pub status: InvoiceStatus,
    pub items: Vec<NewInvoiceItem>,
}

/// A draft that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedDraft {
    pub header: InvoiceHeader,
    /// Non-blank rows in entry order
    pub items: Vec<NewInvoiceItem>,
}

impl InvoiceDraft {
    /// A fresh draft dated `today` with one blank row
    pub fn new(defaults: &InvoiceDefaults, today: NaiveDate) -> Self {
        Self {
            client_id: None,
            issue_date: Some(today),
            issue_place: defaults.issue_place.clone(),
            traffic_date: Some(today),
            traffic_place: Some(defaults.traffic_place.clone()),
            due_date: None,
            payment_method: defaults.payment_method,
            status: InvoiceStatus::Draft,
            items: vec![defaults.blank_item()],
        }
    }

    pub fn with_client(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    /// Replaces the rows
    pub fn with_items(mut self, items: Vec<NewInvoiceItem>) -> Self {
        self.items = items;
        self
    }

    /// Rows that count: those with a product name
    pub fn filled_items(&self) -> impl Iterator<Item = &NewInvoiceItem> {
        self.items.iter().filter(|item| !item.is_blank())
    }

    /// Live totals for the filled rows, `None` while the amounts are out of range
    pub fn preview(&self) -> Option<InvoiceCalculation> {
        checked_calculate(&self.line_items())
    }

    fn line_items(&self) -> Vec<LineItem> {
        self.filled_items().map(NewInvoiceItem::line_item).collect()
    }

    /// Collects every problem with the draft
    pub fn errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.client_id.is_none() {
            errors.push("Client is required".to_string());
        }
        if self.issue_date.is_none() {
            errors.push("Issue date is required".to_string());
        }

        let mut filled = 0usize;
        for (index, item) in self.items.iter().enumerate() {
            if item.is_blank() {
                continue;
            }
            filled += 1;
            errors.extend(
                item_errors(&item.line_item())
                    .into_iter()
                    .map(|e| format!("Item {}: {}", index + 1, e)),
            );
        }
        if filled == 0 {
            errors.push("At least one item is required".to_string());
        } else if errors.is_empty() && checked_calculate(&self.line_items()).is_none() {
            errors.push("Invoice total is out of range".to_string());
        }

        errors
    }

    /// Validates the draft and drops blank rows
    ///
    /// # Errors
    ///
    /// Returns `InvoicingError::Validation` listing all problems found.
    pub fn validate(self) -> Result<ValidatedDraft, InvoicingError> {
        let errors = self.errors();
        let (Some(client_id), Some(issue_date)) = (self.client_id, self.issue_date) else {
            return Err(InvoicingError::Validation(errors));
        };
        if !errors.is_empty() {
            return Err(InvoicingError::Validation(errors));
        }

        Ok(ValidatedDraft {
            header: InvoiceHeader {
                client_id,
                issue_date,
                issue_place: self.issue_place,
                traffic_date: self.traffic_date,
                traffic_place: self.traffic_place.filter(|p| !p.trim().is_empty()),
                due_date: self.due_date,
                payment_method: self.payment_method,
                status: self.status,
            },
            items: self.items.into_iter().filter(|item| !item.is_blank()).collect(),
        })
    }
}

/// Range problems of a single line item
pub fn item_errors(item: &LineItem) -> Vec<String> {
    let mut errors = Vec::new();
    if item.quantity.is_sign_negative() && !item.quantity.is_zero() {
        errors.push(format!("quantity must not be negative (got {})", item.quantity));
    }
    if item.unit_price.is_sign_negative() && !item.unit_price.is_zero() {
        errors.push(format!("unit price must not be negative (got {})", item.unit_price));
    }
    if !is_percentage(item.discount_percent) {
        errors.push(format!("discount must be between 0 and 100 (got {})", item.discount_percent));
    }
    if !is_percentage(item.vat_rate) {
        errors.push(format!("VAT rate must be between 0 and 100 (got {})", item.vat_rate));
    }
    if item.checked_calculate().is_none() {
        errors.push("amount out of range".to_string());
    }
    errors
}

fn is_percentage(value: Decimal) -> bool {
    value >= Decimal::ZERO && value <= dec!(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn wine(name: &str) -> NewInvoiceItem {
        NewInvoiceItem {
            product_name: name.to_string(),
            unit_price: dec!(1200),
            ..InvoiceDefaults::default().blank_item()
        }
    }

    #[test]
    fn test_new_draft_uses_defaults() {
        let draft = InvoiceDraft::new(&InvoiceDefaults::default(), today());

        assert_eq!(draft.issue_place, "Malo Srediste");
        assert_eq!(draft.traffic_place.as_deref(), Some("Vrsac"));
        assert_eq!(draft.payment_method, PaymentMethod::BankTransfer);
        assert_eq!(draft.status, InvoiceStatus::Draft);
        assert_eq!(draft.items.len(), 1);
        assert_eq!(draft.items[0].quantity, Decimal::ONE);
        assert_eq!(draft.items[0].vat_rate, dec!(20));
    }

    #[test]
    fn test_blank_rows_are_dropped() {
        let draft = InvoiceDraft::new(&InvoiceDefaults::default(), today())
            .with_client(ClientId::new())
            .with_items(vec![wine("Tamjanika"), wine("   "), wine("Rizling")]);

        assert_eq!(draft.preview().unwrap().item_calculations.len(), 2);

        let validated = draft.validate().unwrap();
        let names: Vec<_> = validated.items.iter().map(|i| i.product_name.as_str()).collect();
        assert_eq!(names, vec!["Tamjanika", "Rizling"]);
    }

    #[test]
    fn test_missing_client_and_items() {
        let draft = InvoiceDraft::new(&InvoiceDefaults::default(), today());

        let errors = draft.errors();
        assert!(errors.iter().any(|e| e.contains("Client")));
        assert!(errors.iter().any(|e| e.contains("At least one item")));
        assert!(matches!(draft.validate(), Err(InvoicingError::Validation(_))));
    }

    #[test]
    fn test_out_of_range_percentages_are_reported() {
        let mut item = wine("Tamjanika");
        item.discount_percent = dec!(120);
        item.vat_rate = dec!(-5);

        let errors = item_errors(&item.line_item());
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_overflowing_row_is_reported() {
        let mut item = wine("Tamjanika");
        item.quantity = Decimal::from(10i64.pow(15));
        item.unit_price = Decimal::from(10i64.pow(15));

        assert_eq!(item_errors(&item.line_item()), vec!["amount out of range".to_string()]);

        let draft = InvoiceDraft::new(&InvoiceDefaults::default(), today())
            .with_client(ClientId::new())
            .with_items(vec![item]);
        assert_eq!(draft.preview(), None);
        assert!(matches!(draft.validate(), Err(InvoicingError::Validation(_))));
    }

    #[test]
    fn test_overflowing_sum_is_reported() {
        let mut item = wine("Tamjanika");
        item.unit_price = Decimal::from_i128_with_scale(5 * 10i128.pow(28), 0);
        item.vat_rate = Decimal::ZERO;
        assert!(item_errors(&item.line_item()).is_empty());

        let draft = InvoiceDraft::new(&InvoiceDefaults::default(), today())
            .with_client(ClientId::new())
            .with_items(vec![item.clone(), item]);

        assert_eq!(draft.preview(), None);
        assert_eq!(draft.errors(), vec!["Invoice total is out of range".to_string()]);
    }
}
