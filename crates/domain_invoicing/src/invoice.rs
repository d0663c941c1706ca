//! Invoice management
//!
//! An [`Invoice`] is a numbered header plus ordered line items. Its totals
//! are never stored; they are recomputed with [`crate::calculation`] each
//! time they are needed.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{ClientId, Currency, InvoiceId, InvoiceItemId, ProductId};

use crate::calculation::{calculate, checked_calculate, InvoiceCalculation, LineItem};
use crate::numbering::InvoiceNumber;

/// Invoice status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Invoice is being drafted
    #[default]
    Draft,
    /// Invoice has been sent to the client
    Sent,
    /// Fully paid
    Paid,
}

impl InvoiceStatus {
    /// Storage code (`draft`, `sent`, `paid`)
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Paid => "paid",
        }
    }

    /// Label printed on documents and lists
    pub fn label(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "Nacrt",
            InvoiceStatus::Sent => "Poslato",
            InvoiceStatus::Paid => "Plaćeno",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(InvoiceStatus::Draft),
            "sent" => Ok(InvoiceStatus::Sent),
            "paid" => Ok(InvoiceStatus::Paid),
            other => Err(format!("unknown invoice status '{}'", other)),
        }
    }
}

/// How the client pays
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Bank transfer
    #[default]
    #[serde(rename = "virmanom")]
    BankTransfer,
    #[serde(rename = "gotovinom")]
    Cash,
    #[serde(rename = "karticom")]
    Card,
}

impl PaymentMethod {
    /// Storage code as printed on the invoice
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::BankTransfer => "virmanom",
            PaymentMethod::Cash => "gotovinom",
            PaymentMethod::Card => "karticom",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "virmanom" => Ok(PaymentMethod::BankTransfer),
            "gotovinom" => Ok(PaymentMethod::Cash),
            "karticom" => Ok(PaymentMethod::Card),
            other => Err(format!("unknown payment method '{}'", other)),
        }
    }
}

/// Editable header fields of an invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceHeader {
    /// Billed client
    pub client_id: ClientId,
    /// Date of issue
    pub issue_date: NaiveDate,
    /// Place of issue
    pub issue_place: String,
    /// Date of supply ("datum prometa")
    pub traffic_date: Option<NaiveDate>,
    /// Place of supply
    pub traffic_place: Option<String>,
    /// Payment due date ("valuta")
    pub due_date: Option<NaiveDate>,
    /// Payment method
    pub payment_method: PaymentMethod,
    /// Status
    pub status: InvoiceStatus,
}

/// Line item data as entered, before it belongs to an invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInvoiceItem {
    pub product_id: Option<ProductId>,
    pub product_name: String,
    pub quantity: Decimal,
    /// Packaging unit, e.g. `0.75` for a 0.75 l bottle
    pub unit: String,
    pub unit_price: Decimal,
    pub discount_percent: Decimal,
    pub vat_rate: Decimal,
}

impl NewInvoiceItem {
    /// Projects onto the calculation input
    pub fn line_item(&self) -> LineItem {
        LineItem::new(self.quantity, self.unit_price, self.discount_percent, self.vat_rate)
    }

    /// Returns true when the row has no product name and should be ignored
    pub fn is_blank(&self) -> bool {
        self.product_name.trim().is_empty()
    }
}

/// A line item on an invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItem {
    /// Item ID
    pub id: InvoiceItemId,
    /// Catalog product, if the row was picked from the catalog
    pub product_id: Option<ProductId>,
    /// Name printed on the invoice
    pub product_name: String,
    /// Quantity
    pub quantity: Decimal,
    /// Packaging unit
    pub unit: String,
    /// Unit price, VAT excluded
    pub unit_price: Decimal,
    /// Discount percentage
    pub discount_percent: Decimal,
    /// VAT rate percentage
    pub vat_rate: Decimal,
    /// Position on the invoice, 0-based
    pub sort_order: u32,
}

impl InvoiceItem {
    /// Creates an item at the given position
    pub fn from_new(item: NewInvoiceItem, sort_order: u32) -> Self {
        Self {
            id: InvoiceItemId::new_v7(),
            product_id: item.product_id,
            product_name: item.product_name,
            quantity: item.quantity,
            unit: item.unit,
            unit_price: item.unit_price,
            discount_percent: item.discount_percent,
            vat_rate: item.vat_rate,
            sort_order,
        }
    }

    /// Projects onto the calculation input
    pub fn line_item(&self) -> LineItem {
        LineItem::new(self.quantity, self.unit_price, self.discount_percent, self.vat_rate)
    }
}

/// An invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier
    pub id: InvoiceId,
    number: InvoiceNumber,
    /// Header fields
    pub header: InvoiceHeader,
    /// Currency of all amounts
    pub currency: Currency,
    items: Vec<InvoiceItem>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// User who created the invoice
    pub created_by: Option<String>,
}

impl Invoice {
    /// Creates a new invoice with an already allocated number
    ///
    /// Items get `sort_order` 0..n in the given order.
    pub fn new(
        number: InvoiceNumber,
        header: InvoiceHeader,
        items: Vec<NewInvoiceItem>,
        currency: Currency,
        created_by: Option<String>,
    ) -> Self {
        Self {
            id: InvoiceId::new_v7(),
            number,
            header,
            currency,
            items: number_items(items),
            created_at: Utc::now(),
            created_by,
        }
    }

    /// Rebuilds an invoice loaded from storage
    ///
    /// Items are ordered by `sort_order`.
    pub fn restore(
        id: InvoiceId,
        number: InvoiceNumber,
        header: InvoiceHeader,
        currency: Currency,
        mut items: Vec<InvoiceItem>,
        created_at: DateTime<Utc>,
        created_by: Option<String>,
    ) -> Self {
        items.sort_by_key(|item| item.sort_order);
        Self {
            id,
            number,
            header,
            currency,
            items,
            created_at,
            created_by,
        }
    }

    /// The invoice number; fixed at creation
    pub fn number(&self) -> InvoiceNumber {
        self.number
    }

    /// Items in printing order
    pub fn items(&self) -> &[InvoiceItem] {
        &self.items
    }

    /// Replaces header and items; number, id and creation data stay
    pub fn replace(&mut self, header: InvoiceHeader, items: Vec<NewInvoiceItem>) {
        self.header = header;
        self.items = number_items(items);
    }

    /// Sets the status
    pub fn set_status(&mut self, status: InvoiceStatus) {
        self.header.status = status;
    }

    /// Returns true once the invoice is paid
    pub fn is_paid(&self) -> bool {
        self.header.status == InvoiceStatus::Paid
    }

    /// Checks if the invoice is past its due date and unpaid
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.header.due_date {
            Some(due) => today > due && !self.is_paid(),
            None => false,
        }
    }

    /// Calculation inputs, aligned index-for-index with [`Invoice::items`]
    pub fn line_items(&self) -> Vec<LineItem> {
        self.items.iter().map(InvoiceItem::line_item).collect()
    }

    /// Computes totals from the current items
    ///
    /// # Panics
    ///
    /// Panics if the amounts overflow, which validated drafts rule out.
    pub fn calculate(&self) -> InvoiceCalculation {
        calculate(&self.line_items())
    }

    /// Like [`Invoice::calculate`], `None` when the amounts overflow
    pub fn checked_calculate(&self) -> Option<InvoiceCalculation> {
        checked_calculate(&self.line_items())
    }
}

fn number_items(items: Vec<NewInvoiceItem>) -> Vec<InvoiceItem> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| InvoiceItem::from_new(item, index as u32))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn header(due_date: Option<NaiveDate>) -> InvoiceHeader {
        InvoiceHeader {
            client_id: ClientId::new(),
            issue_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            issue_place: "Malo Srediste".to_string(),
            traffic_date: None,
            traffic_place: None,
            due_date,
            payment_method: PaymentMethod::default(),
            status: InvoiceStatus::Sent,
        }
    }

    fn item(name: &str, price: Decimal) -> NewInvoiceItem {
        NewInvoiceItem {
            product_id: None,
            product_name: name.to_string(),
            quantity: dec!(1),
            unit: "0.75".to_string(),
            unit_price: price,
            discount_percent: Decimal::ZERO,
            vat_rate: dec!(20),
        }
    }

    fn invoice() -> Invoice {
        Invoice::new(
            InvoiceNumber::new(1, 2024).unwrap(),
            header(NaiveDate::from_ymd_opt(2024, 3, 31)),
            vec![item("Tamjanika", dec!(100)), item("Rizling", dec!(200))],
            Currency::RSD,
            None,
        )
    }

    #[test]
    fn test_status_codes_and_labels() {
        assert_eq!("paid".parse::<InvoiceStatus>().unwrap(), InvoiceStatus::Paid);
        assert_eq!(InvoiceStatus::Paid.label(), "Plaćeno");
        assert_eq!(InvoiceStatus::Draft.to_string(), "draft");
        assert!("cancelled".parse::<InvoiceStatus>().is_err());

        assert_eq!("gotovinom".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!(serde_json::to_string(&PaymentMethod::Card).unwrap(), "\"karticom\"");
    }

    #[test]
    fn test_replace_renumbers_items_and_keeps_number() {
        let mut invoice = invoice();
        let number = invoice.number();

        invoice.replace(header(None), vec![item("Rose", dec!(50))]);

        assert_eq!(invoice.number(), number);
        assert_eq!(invoice.items().len(), 1);
        assert_eq!(invoice.items()[0].sort_order, 0);
        assert_eq!(invoice.calculate().total, dec!(60));
    }

    #[test]
    fn test_restore_sorts_items() {
        let original = invoice();
        let mut items = original.items().to_vec();
        items.reverse();

        let restored = Invoice::restore(
            original.id,
            original.number(),
            original.header.clone(),
            original.currency,
            items,
            original.created_at,
            None,
        );

        assert_eq!(restored.items()[0].product_name, "Tamjanika");
        assert_eq!(restored, original);
    }

    #[test]
    fn test_overdue() {
        let mut invoice = invoice();
        let after_due = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();

        assert!(invoice.is_overdue(after_due));
        invoice.set_status(InvoiceStatus::Paid);
        assert!(!invoice.is_overdue(after_due));
    }
}
