//! Domain Adapters
//!
//! Implementations of the invoicing ports on top of the repository layer.
//! Each adapter translates between domain types and row types and maps
//! `DatabaseError` into the error its port expects.
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_db::adapters::{PostgresInvoiceNumberAllocator, PostgresInvoiceStore};
//! use domain_invoicing::InvoiceService;
//! use std::sync::Arc;
//!
//! let service = InvoiceService::new(
//!     Arc::new(PostgresInvoiceNumberAllocator::new(pool.clone())),
//!     Arc::new(PostgresInvoiceStore::new(pool)),
//! );
//! ```

pub mod invoice_number;
pub mod invoice_store;

pub use invoice_number::PostgresInvoiceNumberAllocator;
pub use invoice_store::PostgresInvoiceStore;
