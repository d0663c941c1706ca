//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for invoicing types that give
//! more meaningful error messages than standard assertions.

use std::collections::HashSet;

use domain_invoicing::{InvoiceCalculation, InvoiceNumber, ItemCalculation};
use rust_decimal::Decimal;

/// Asserts that two amounts are equal within a tolerance
///
/// # Panics
///
/// Panics if the amounts differ by more than `tolerance`
pub fn assert_amount_approx_eq(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "Amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual,
        expected,
        diff,
        tolerance
    );
}

/// Asserts the per-row identities of an item calculation
///
/// net = base - discount and total = net + vat, exactly.
pub fn assert_item_consistent(calc: &ItemCalculation) {
    assert_eq!(
        calc.net_amount,
        calc.base_amount - calc.discount_amount,
        "net {} != base {} - discount {}",
        calc.net_amount,
        calc.base_amount,
        calc.discount_amount
    );
    assert_eq!(
        calc.total,
        calc.net_amount + calc.vat_amount,
        "total {} != net {} + vat {}",
        calc.total,
        calc.net_amount,
        calc.vat_amount
    );
}

/// Asserts that the aggregates equal the sums over the item calculations
pub fn assert_calculation_consistent(result: &InvoiceCalculation) {
    for calc in &result.item_calculations {
        assert_item_consistent(calc);
    }

    let subtotal: Decimal = result.item_calculations.iter().map(|c| c.net_amount).sum();
    let vat: Decimal = result.item_calculations.iter().map(|c| c.vat_amount).sum();
    let total: Decimal = result.item_calculations.iter().map(|c| c.total).sum();

    assert_eq!(result.subtotal, subtotal, "subtotal is not the sum of net amounts");
    assert_eq!(result.vat_amount, vat, "VAT is not the sum of item VAT");
    assert_eq!(result.total, total, "total is not the sum of item totals");
}

/// Asserts that no invoice number appears twice
pub fn assert_numbers_distinct<'a>(numbers: impl IntoIterator<Item = &'a InvoiceNumber>) {
    let mut seen = HashSet::new();
    for number in numbers {
        assert!(seen.insert(*number), "Invoice number {} was issued twice", number);
    }
}

/// Asserts that raw counter values are exactly 1..=n with no gaps or repeats
pub fn assert_contiguous_from_one(numbers: &[u32]) {
    let mut sorted = numbers.to_vec();
    sorted.sort_unstable();
    let expected: Vec<u32> = (1..=numbers.len() as u32).collect();
    assert_eq!(sorted, expected, "Numbers are not a contiguous sequence from 1");
}
