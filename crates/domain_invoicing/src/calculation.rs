//! Invoice calculation engine
//!
//! Turns an ordered list of line items into per-item and aggregate figures:
//!
//! ```text
//! base      = quantity × unit_price
//! discount  = base × discount% / 100
//! net       = base − discount          (tax base, "osnovica")
//! vat       = net × vat% / 100
//! total     = net + vat
//! ```
//!
//! All arithmetic is done in `Decimal` without intermediate rounding. The
//! aggregates are sums of the unrounded per-item figures; rounding to two
//! decimals happens only in [`InvoiceCalculation::display_totals`].
//!
//! The engine performs no validation. Negative or >100 percentages are
//! computed literally; range checks belong to [`crate::draft`].
//!
//! Its domain is inputs whose figures fit in a `Decimal`. [`calculate`]
//! panics outside it; [`checked_calculate`] returns `None` instead and is
//! what validation and live previews use.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{format_amount, round_for_display, Currency, Money, Rate};

/// Calculation input for one invoice row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Quantity sold
    pub quantity: Decimal,
    /// Price per unit, VAT excluded
    pub unit_price: Decimal,
    /// Discount ("rabat") as a percentage of the base amount
    pub discount_percent: Decimal,
    /// VAT ("PDV") rate as a percentage of the net amount
    pub vat_rate: Decimal,
}

impl LineItem {
    /// Creates a line item
    pub fn new(
        quantity: Decimal,
        unit_price: Decimal,
        discount_percent: Decimal,
        vat_rate: Decimal,
    ) -> Self {
        Self {
            quantity,
            unit_price,
            discount_percent,
            vat_rate,
        }
    }

    /// Computes the figures for this row
    ///
    /// # Panics
    ///
    /// Panics if a figure does not fit in a `Decimal`. Rows accepted by
    /// [`crate::draft::item_errors`] always fit.
    pub fn calculate(&self) -> ItemCalculation {
        let base_amount = self.quantity * self.unit_price;
        let discount_amount = Rate::from_percentage(self.discount_percent).of(base_amount);
        let net_amount = base_amount - discount_amount;
        let vat_amount = Rate::from_percentage(self.vat_rate).of(net_amount);
        let total = net_amount + vat_amount;

        ItemCalculation {
            base_amount,
            discount_amount,
            net_amount,
            vat_amount,
            total,
        }
    }

    /// Like [`LineItem::calculate`], `None` when a figure overflows
    pub fn checked_calculate(&self) -> Option<ItemCalculation> {
        let base_amount = self.quantity.checked_mul(self.unit_price)?;
        let discount_amount = Rate::from_percentage(self.discount_percent).checked_of(base_amount)?;
        let net_amount = base_amount.checked_sub(discount_amount)?;
        let vat_amount = Rate::from_percentage(self.vat_rate).checked_of(net_amount)?;
        let total = net_amount.checked_add(vat_amount)?;

        Some(ItemCalculation {
            base_amount,
            discount_amount,
            net_amount,
            vat_amount,
            total,
        })
    }
}

/// Figures for a single line item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCalculation {
    /// quantity × unit price
    pub base_amount: Decimal,
    /// Discount taken off the base amount
    pub discount_amount: Decimal,
    /// Tax base after discount
    pub net_amount: Decimal,
    /// VAT on the net amount
    pub vat_amount: Decimal,
    /// Net amount plus VAT
    pub total: Decimal,
}

/// Aggregate figures for a whole invoice
///
/// Recomputed from scratch on every call to [`calculate`]; it carries no
/// identity and is never updated incrementally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceCalculation {
    /// Sum of net amounts (the taxable base)
    pub subtotal: Decimal,
    /// Sum of VAT amounts
    pub vat_amount: Decimal,
    /// Sum of item totals
    pub total: Decimal,
    /// One entry per input item, same order
    pub item_calculations: Vec<ItemCalculation>,
}

impl InvoiceCalculation {
    /// An empty calculation: all aggregates zero, no items
    pub fn empty() -> Self {
        Self {
            subtotal: Decimal::ZERO,
            vat_amount: Decimal::ZERO,
            total: Decimal::ZERO,
            item_calculations: Vec::new(),
        }
    }

    /// Returns true when no items were calculated
    pub fn is_empty(&self) -> bool {
        self.item_calculations.is_empty()
    }

    /// Aggregates rounded to two decimals for display
    pub fn display_totals(&self) -> DisplayTotals {
        DisplayTotals {
            subtotal: round_for_display(self.subtotal),
            vat_amount: round_for_display(self.vat_amount),
            total: round_for_display(self.total),
        }
    }

    /// Grand total as money in the given currency, rounded to its minor unit
    pub fn total_money(&self, currency: Currency) -> Money {
        Money::new(self.total, currency).round_to_currency()
    }
}

impl Default for InvoiceCalculation {
    fn default() -> Self {
        Self::empty()
    }
}

/// Invoice aggregates rounded for the printed document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayTotals {
    pub subtotal: Decimal,
    pub vat_amount: Decimal,
    pub total: Decimal,
}

impl DisplayTotals {
    /// Formats the three figures in sr-RS notation: (subtotal, VAT, total)
    pub fn formatted(&self) -> (String, String, String) {
        (
            format_amount(self.subtotal),
            format_amount(self.vat_amount),
            format_amount(self.total),
        )
    }
}

/// Calculates one line item
pub fn calculate_item(item: &LineItem) -> ItemCalculation {
    item.calculate()
}

/// Calculates an invoice from its line items
///
/// Has no side effects. `item_calculations[i]` belongs to `items[i]`.
///
/// # Panics
///
/// Panics if a figure or a sum does not fit in a `Decimal`; see
/// [`checked_calculate`].
///
/// # Example
///
/// ```rust
/// use domain_invoicing::calculation::{calculate, LineItem};
/// use rust_decimal_macros::dec;
///
/// let result = calculate(&[LineItem::new(dec!(6), dec!(1200.00), dec!(10), dec!(20))]);
/// assert_eq!(result.subtotal, dec!(6480.00));
/// assert_eq!(result.vat_amount, dec!(1296.00));
/// assert_eq!(result.total, dec!(7776.00));
/// ```
pub fn calculate(items: &[LineItem]) -> InvoiceCalculation {
    let item_calculations: Vec<ItemCalculation> = items.iter().map(calculate_item).collect();

    let (subtotal, vat_amount, total) = item_calculations.iter().fold(
        (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
        |(subtotal, vat, total), calc| {
            (subtotal + calc.net_amount, vat + calc.vat_amount, total + calc.total)
        },
    );

    InvoiceCalculation {
        subtotal,
        vat_amount,
        total,
        item_calculations,
    }
}

/// Like [`calculate`], `None` when any figure or sum overflows
pub fn checked_calculate(items: &[LineItem]) -> Option<InvoiceCalculation> {
    let item_calculations = items
        .iter()
        .map(LineItem::checked_calculate)
        .collect::<Option<Vec<_>>>()?;

    let (subtotal, vat_amount, total) = item_calculations.iter().try_fold(
        (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
        |(subtotal, vat, total), calc| {
            Some((
                subtotal.checked_add(calc.net_amount)?,
                vat.checked_add(calc.vat_amount)?,
                total.checked_add(calc.total)?,
            ))
        },
    )?;

    Some(InvoiceCalculation {
        subtotal,
        vat_amount,
        total,
        item_calculations,
    })
}
