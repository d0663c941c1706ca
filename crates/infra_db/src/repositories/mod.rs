//! Repository implementations
//!
//! Repositories own the SQL and map rows to plain row structs (or, for
//! clients, straight to the domain type). Statements are runtime-checked
//! `sqlx::query`/`query_as` calls.

pub mod client;
pub mod invoice;
pub mod invoice_counter;

pub use client::{ClientRepository, ClientRow};
pub use invoice::{InvoiceItemRow, InvoiceQuery, InvoiceRepository, InvoiceRow, InvoiceWithItems};
pub use invoice_counter::InvoiceCounterRepository;
