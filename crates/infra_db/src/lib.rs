//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for the invoicing core using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern. Repositories speak in row
//! types; adapters implement the domain ports (`InvoiceNumberAllocator`,
//! `InvoiceStore`) on top of them.
//!
//! # Invoice Numbering
//!
//! Invoice numbers come from the `invoice_counters` table, one row per year,
//! advanced by a single atomic upsert. Numbers are unique per year and are
//! never reused, even when the invoice that took one is never saved.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, DatabaseConfig};
//! use infra_db::adapters::PostgresInvoiceNumberAllocator;
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/fakture")).await?;
//! let allocator = PostgresInvoiceNumberAllocator::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabasePool, create_pool, DatabaseConfig, DEFAULT_DATABASE_URL};
pub use error::DatabaseError;
pub use adapters::{PostgresInvoiceNumberAllocator, PostgresInvoiceStore};
