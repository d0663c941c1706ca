//! Invoicing domain errors

use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur in the invoicing domain
#[derive(Debug, Error)]
pub enum InvoicingError {
    /// The store could not atomically hand out a unique number
    ///
    /// The caller must abort invoice creation; it may retry the whole workflow.
    #[error("Invoice number allocation failed for year {year}: {reason}")]
    AllocationFailed {
        year: i32,
        reason: String,
    },

    /// Invoice not found
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(String),

    /// Malformed invoice number
    #[error("Invalid invoice number: {0}")]
    InvalidInvoiceNumber(String),

    /// Draft failed caller-side validation
    #[error("Invoice validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Persistence failed
    #[error("Invoice store error: {0}")]
    Store(#[from] PortError),
}

impl InvoicingError {
    /// Creates an AllocationFailed error
    pub fn allocation_failed(year: i32, reason: impl Into<String>) -> Self {
        InvoicingError::AllocationFailed {
            year,
            reason: reason.into(),
        }
    }

    /// Returns true if this error came from number allocation
    pub fn is_allocation_failure(&self) -> bool {
        matches!(self, InvoicingError::AllocationFailed { .. })
    }
}
