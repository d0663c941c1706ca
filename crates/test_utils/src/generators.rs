//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating invoice line items and
//! related data. Magnitudes stay bounded so products of quantity, price
//! and rate fit comfortably in a `Decimal`.

use core_kernel::{ClientId, Currency};
use domain_invoicing::{LineItem, NewInvoiceItem};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for generating currencies
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![Just(Currency::RSD), Just(Currency::EUR), Just(Currency::USD)]
}

/// Quantities from 0 to 10 000 with up to three decimals
pub fn quantity_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|n| Decimal::new(n, 3))
}

/// Unit prices from 0 to 1 000 000.00
pub fn price_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Percentages from 0 to 100 inclusive, two decimals
pub fn percentage_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Commonly used Serbian VAT rates
pub fn vat_rate_strategy() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        Just(Decimal::ZERO),
        Just(Decimal::from(10)),
        Just(Decimal::from(20)),
        percentage_strategy(),
    ]
}

/// Strategy for line items that pass draft validation
pub fn line_item_strategy() -> impl Strategy<Value = LineItem> {
    (quantity_strategy(), price_strategy(), percentage_strategy(), vat_rate_strategy())
        .prop_map(|(quantity, unit_price, discount, vat)| LineItem::new(quantity, unit_price, discount, vat))
}

/// Strategy for line items with negative or out-of-range values
///
/// The calculation engine accepts these; only the draft rejects them.
pub fn unchecked_line_item_strategy() -> impl Strategy<Value = LineItem> {
    (
        -10_000_000i64..10_000_000i64,
        -100_000_000i64..100_000_000i64,
        -50_000i64..50_000i64,
        -50_000i64..50_000i64,
    )
        .prop_map(|(q, p, d, v)| {
            LineItem::new(Decimal::new(q, 3), Decimal::new(p, 2), Decimal::new(d, 2), Decimal::new(v, 2))
        })
}

/// Up to `max` valid line items
pub fn line_items_strategy(max: usize) -> impl Strategy<Value = Vec<LineItem>> {
    proptest::collection::vec(line_item_strategy(), 0..=max)
}

/// Product names in the style of a wine list
pub fn wine_name_strategy() -> impl Strategy<Value = String> {
    ("[A-Z][a-z]{3,10}", 2015u32..2025u32).prop_map(|(name, vintage)| format!("{} {}", name, vintage))
}

/// Strategy for generating named invoice rows
pub fn new_invoice_item_strategy() -> impl Strategy<Value = NewInvoiceItem> {
    (wine_name_strategy(), line_item_strategy()).prop_map(|(name, item)| NewInvoiceItem {
        product_id: None,
        product_name: name,
        quantity: item.quantity,
        unit: "0.75".to_string(),
        unit_price: item.unit_price,
        discount_percent: item.discount_percent,
        vat_rate: item.vat_rate,
    })
}

/// Strategy for generating ClientId
pub fn client_id_strategy() -> impl Strategy<Value = ClientId> {
    any::<[u8; 16]>().prop_map(|bytes| ClientId::from_uuid(uuid::Uuid::from_bytes(bytes)))
}

/// Strategy for 9-digit tax numbers
pub fn pib_strategy() -> impl Strategy<Value = String> {
    "[0-9]{9}".prop_map(|s| s)
}

/// Strategy for 8-digit registration numbers
pub fn mb_strategy() -> impl Strategy<Value = String> {
    "[0-9]{8}".prop_map(|s| s)
}

/// Strategy for generating valid email addresses
pub fn email_strategy() -> impl Strategy<Value = String> {
    ("[a-z]{5,10}", "[a-z]{3,8}").prop_map(|(local, domain)| format!("{}@{}.rs", local, domain))
}
