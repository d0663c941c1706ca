//! Invoice numbers
//!
//! Invoices are numbered sequentially per fiscal year and shown as
//! `"{number}/{year}"` (e.g. `6/2024`). Numbers come from an
//! [`InvoiceNumberAllocator`](crate::ports::InvoiceNumberAllocator); once
//! assigned they never change.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::InvoicingError;

/// Placeholder used in subjects when the client has no name
pub const UNKNOWN_CLIENT: &str = "Nepoznat klijent";

/// A sequential invoice number within a fiscal year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InvoiceNumber {
    // field order gives (year, number) ordering
    year: i32,
    number: u32,
}

impl InvoiceNumber {
    /// Creates an invoice number
    ///
    /// # Errors
    ///
    /// Returns `InvoicingError::InvalidInvoiceNumber` when `number` is zero.
    pub fn new(number: u32, year: i32) -> Result<Self, InvoicingError> {
        if number == 0 {
            return Err(InvoicingError::InvalidInvoiceNumber(format!("0/{}", year)));
        }
        Ok(Self { year, number })
    }

    /// Sequential number within the year (starts at 1)
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Fiscal year
    pub fn year(&self) -> i32 {
        self.year
    }

    /// File name of the rendered document, e.g. `faktura-6-2024.pdf`
    pub fn document_filename(&self) -> String {
        format!("faktura-{}-{}.pdf", self.number, self.year)
    }

    /// Subject line for the e-mail carrying the document
    pub fn email_subject(&self, client_name: &str) -> String {
        let client_name = client_name.trim();
        let client_name = if client_name.is_empty() { UNKNOWN_CLIENT } else { client_name };
        format!("Faktura {} - {}", self, client_name)
    }
}

impl fmt::Display for InvoiceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.number, self.year)
    }
}

impl FromStr for InvoiceNumber {
    type Err = InvoicingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvoicingError::InvalidInvoiceNumber(s.to_string());

        let (number, year) = s.trim().split_once('/').ok_or_else(invalid)?;
        let number: u32 = number.trim().parse().map_err(|_| invalid())?;
        let year: i32 = year.trim().parse().map_err(|_| invalid())?;

        Self::new(number, year).map_err(|_| invalid())
    }
}
