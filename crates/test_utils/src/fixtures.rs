//! Pre-built Test Fixtures
//!
//! Ready-to-use test data for invoices, clients and the company profile.
//! Everything here is deterministic unless the name says otherwise.

use chrono::NaiveDate;
use core_kernel::ClientId;
use domain_invoicing::{InvoiceDefaults, LineItem, NewInvoiceItem};
use domain_party::{Client, CompanySettings};
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::SafeEmail;
use fake::Fake;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

static FIXTURE_CLIENT_ID: Lazy<ClientId> = Lazy::new(|| {
    ClientId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440001").unwrap())
});

/// Shorthand for a calendar date
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Six bottles at 1200.00 with a 10% discount and 20% VAT
///
/// Net 6480.00, VAT 1296.00, total 7776.00.
pub fn scenario_item_a() -> NewInvoiceItem {
    wine_item("Tamjanika 2022", dec!(6), dec!(1200.00))
        .with_discount(dec!(10))
}

/// One tasting at 500.00, no discount, no VAT
pub fn scenario_item_b() -> NewInvoiceItem {
    NewInvoiceItem {
        unit: "kom".to_string(),
        vat_rate: Decimal::ZERO,
        ..wine_item("Degustacija", Decimal::ONE, dec!(500.00))
    }
}

/// A 0.75 l bottle row at the standard 20% VAT and no discount
pub fn wine_item(name: &str, quantity: Decimal, unit_price: Decimal) -> NewInvoiceItem {
    NewInvoiceItem {
        product_id: None,
        product_name: name.to_string(),
        quantity,
        unit: "0.75".to_string(),
        unit_price,
        discount_percent: Decimal::ZERO,
        vat_rate: dec!(20),
    }
}

/// Extension for adjusting fixture rows
pub trait NewInvoiceItemExt {
    fn with_discount(self, discount_percent: Decimal) -> Self;
    fn with_vat(self, vat_rate: Decimal) -> Self;
}

impl NewInvoiceItemExt for NewInvoiceItem {
    fn with_discount(mut self, discount_percent: Decimal) -> Self {
        self.discount_percent = discount_percent;
        self
    }

    fn with_vat(mut self, vat_rate: Decimal) -> Self {
        self.vat_rate = vat_rate;
        self
    }
}

/// The two scenario rows as calculation input
pub fn scenario_line_items() -> Vec<LineItem> {
    vec![scenario_item_a().line_item(), scenario_item_b().line_item()]
}

/// Deterministic client ID shared across tests
pub fn fixture_client_id() -> ClientId {
    *FIXTURE_CLIENT_ID
}

/// A valid client with a fixed ID
pub fn sample_client() -> Client {
    let mut client = Client::new("Vinoteka Nis", "101234567", "20123456")
        .with_address("Obrenoviceva 12", "Nis")
        .with_email("nabavka@vinoteka.example");
    client.id = fixture_client_id();
    client
}

/// A valid client with a random company name and email
pub fn random_client() -> Client {
    let name: String = CompanyName().fake();
    let email: String = SafeEmail().fake();
    let pib: u32 = (100_000_000u32..999_999_999u32).fake();
    let mb: u32 = (10_000_000u32..99_999_999u32).fake();
    Client::new(name, &pib.to_string(), &mb.to_string()).with_email(email)
}

/// The winery's own company profile
pub fn sample_company() -> CompanySettings {
    CompanySettings::new("Milan Petrovic", "Vinarija Malo Srediste", "109876543", "21987654")
        .with_bank("160-0000000123456-78", "Banca Intesa")
        .with_email("vinarija@example.com")
}

/// Invoice defaults as a fresh installation has them
pub fn default_invoice_settings() -> InvoiceDefaults {
    InvoiceDefaults::default()
}
