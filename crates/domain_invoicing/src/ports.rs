//! Invoicing Domain Ports
//!
//! Port interfaces for the two stores the invoicing workflow depends on:
//!
//! - [`InvoiceNumberAllocator`]: the atomic per-year counter
//! - [`InvoiceStore`]: persistence of invoice headers and items
//!
//! # Adapters
//!
//! - **Postgres**: `infra_db::adapters` (counter row + invoice tables)
//! - **In-memory**: [`crate::adapters::memory`] for tests and local runs
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_invoicing::ports::{InvoiceNumberAllocator, InvoiceNumberAllocatorExt};
//! use std::sync::Arc;
//!
//! let allocator: Arc<dyn InvoiceNumberAllocator> = Arc::new(PostgresInvoiceNumberAllocator::new(pool));
//! let number = allocator.allocate(2024).await?;
//! println!("{}", number); // 6/2024
//! ```

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::{DomainPort, InvoiceId, PortError};

use crate::error::InvoicingError;
use crate::invoice::{Invoice, InvoiceStatus};
use crate::numbering::InvoiceNumber;

/// Hands out sequential invoice numbers per fiscal year
///
/// Implementations must perform the increment as a single atomic request
/// against their backing store. Two concurrent calls for the same year must
/// never return the same value. Every successful call consumes a number,
/// even if the invoice it was meant for is never saved.
#[async_trait]
pub trait InvoiceNumberAllocator: DomainPort {
    /// Returns the next unused number (≥ 1) for `year`
    ///
    /// # Errors
    ///
    /// Returns `InvoicingError::AllocationFailed` when the store cannot
    /// atomically produce a number.
    async fn next_invoice_number(&self, year: i32) -> Result<u32, InvoicingError>;
}

/// Extension methods for allocators
#[async_trait]
pub trait InvoiceNumberAllocatorExt: InvoiceNumberAllocator {
    /// Allocates a number and pairs it with its year
    ///
    /// A zero from the store is reported as an allocation failure.
    async fn allocate(&self, year: i32) -> Result<InvoiceNumber, InvoicingError> {
        let number = self.next_invoice_number(year).await?;
        InvoiceNumber::new(number, year)
            .map_err(|_| InvoicingError::allocation_failed(year, "store returned a non-positive counter"))
    }
}

impl<T: InvoiceNumberAllocator + ?Sized> InvoiceNumberAllocatorExt for T {}

/// An invoice together with the name of its client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    pub invoice: Invoice,
    /// `None` when the client row no longer exists
    pub client_name: Option<String>,
}

impl InvoiceRecord {
    pub fn new(invoice: Invoice, client_name: Option<String>) -> Self {
        Self { invoice, client_name }
    }
}

/// Query parameters for listing invoices
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceFilter {
    /// Matched against the formatted number (`6/2024`) and client name, case-insensitive
    pub search: Option<String>,
    /// `None` lists every status
    pub status: Option<InvoiceStatus>,
    /// Earliest issue date, inclusive
    pub issued_from: Option<NaiveDate>,
    /// Latest issue date, inclusive
    pub issued_to: Option<NaiveDate>,
}

impl InvoiceFilter {
    /// Lists everything
    pub fn all() -> Self {
        Self::default()
    }

    /// Creates a filter with a search term
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            ..Default::default()
        }
    }

    /// Restricts to one status
    pub fn with_status(mut self, status: InvoiceStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts to invoices issued between `from` and `to`, both inclusive
    pub fn issued_between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.issued_from = Some(from);
        self.issued_to = Some(to);
        self
    }

    /// Returns true if the record passes every criterion
    pub fn matches(&self, record: &InvoiceRecord) -> bool {
        let header = &record.invoice.header;

        if let Some(status) = self.status {
            if header.status != status {
                return false;
            }
        }
        if let Some(from) = self.issued_from {
            if header.issue_date < from {
                return false;
            }
        }
        if let Some(to) = self.issued_to {
            if header.issue_date > to {
                return false;
            }
        }
        if let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let term = term.to_lowercase();
            let number = record.invoice.number().to_string();
            let client = record.client_name.as_deref().unwrap_or_default().to_lowercase();
            if !number.contains(&term) && !client.contains(&term) {
                return false;
            }
        }
        true
    }

    /// Keeps matching records, newest number first
    pub fn apply(&self, records: impl IntoIterator<Item = InvoiceRecord>) -> Vec<InvoiceRecord> {
        let mut results: Vec<_> = records.into_iter().filter(|r| self.matches(r)).collect();
        sort_newest_first(&mut results);
        results
    }
}

/// Orders records by year then number, both descending
pub fn sort_newest_first(records: &mut [InvoiceRecord]) {
    records.sort_by(|a, b| b.invoice.number().cmp(&a.invoice.number()));
}

/// Persistence of invoices
///
/// Implementations write the header before the items so that no item row
/// exists without its numbered invoice.
#[async_trait]
pub trait InvoiceStore: DomainPort {
    /// Persists a new invoice
    ///
    /// # Errors
    ///
    /// `PortError::Conflict` when the number is already taken for its year.
    async fn insert_invoice(&self, invoice: &Invoice) -> Result<(), PortError>;

    /// Replaces header fields and items of an existing invoice
    async fn update_invoice(&self, invoice: &Invoice) -> Result<(), PortError>;

    /// Loads one invoice with its items
    async fn get_invoice(&self, id: InvoiceId) -> Result<InvoiceRecord, PortError>;

    /// Lists invoices matching the filter, newest number first
    async fn list_invoices(&self, filter: &InvoiceFilter) -> Result<Vec<InvoiceRecord>, PortError>;
}
