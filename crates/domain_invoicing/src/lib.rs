//! Invoicing Domain - Calculation and Numbering
//!
//! This crate implements the invoicing core of the winery back office:
//! turning line items into tax-inclusive totals and handing out
//! collision-free invoice numbers per fiscal year.
//!
//! # Calculation
//!
//! Each line item yields base, discount, net (tax base), VAT and total
//! figures. The invoice aggregates are plain sums of the unrounded item
//! figures, rounded to two decimals only for display. The engine is a pure
//! function and never fails.
//!
//! # Numbering
//!
//! Numbers are sequential within a fiscal year and printed as `6/2024`.
//! They come from an [`InvoiceNumberAllocator`], which must increment its
//! per-year counter atomically. Gaps are acceptable; duplicates are not.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_invoicing::{InvoiceService, InvoiceDraft};
//!
//! let service = InvoiceService::new(allocator, store);
//! let draft = service.new_draft(today).with_client(client_id).with_items(items);
//!
//! let invoice = service.create_invoice(draft, 2024, OperationMetadata::default()).await?;
//! println!("{} {}", invoice.number(), invoice.calculate().display_totals().total);
//! ```

pub mod calculation;
pub mod numbering;
pub mod invoice;
pub mod product;
pub mod draft;
pub mod ports;
pub mod adapters;
pub mod services;
pub mod report;
pub mod error;

pub use calculation::{calculate, calculate_item, checked_calculate, DisplayTotals, InvoiceCalculation, ItemCalculation, LineItem};
pub use numbering::{InvoiceNumber, UNKNOWN_CLIENT};
pub use invoice::{Invoice, InvoiceHeader, InvoiceItem, InvoiceStatus, NewInvoiceItem, PaymentMethod};
pub use product::{Product, STANDARD_VAT_RATE};
pub use draft::{InvoiceDefaults, InvoiceDraft, ValidatedDraft};
pub use ports::{
    InvoiceFilter, InvoiceNumberAllocator, InvoiceNumberAllocatorExt, InvoiceRecord, InvoiceStore,
};
pub use services::InvoiceService;
pub use report::RevenueReport;
pub use error::InvoicingError;
