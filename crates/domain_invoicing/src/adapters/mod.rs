//! Port adapters shipped with the domain crate
//!
//! The Postgres adapters live in `infra_db`.

pub mod memory;

pub use memory::{InMemoryInvoiceNumberAllocator, InMemoryInvoiceStore};
