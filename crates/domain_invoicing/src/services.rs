//! Invoicing services
//!
//! [`InvoiceService`] orchestrates the creation workflow: validate the draft,
//! allocate a number exactly once, then persist the numbered invoice. Totals
//! are always recomputed from the items and never stored.

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use core_kernel::{InvoiceId, OperationMetadata};

use crate::calculation::{checked_calculate, InvoiceCalculation};
use crate::draft::{InvoiceDefaults, InvoiceDraft};
use crate::error::InvoicingError;
use crate::invoice::{Invoice, InvoiceStatus, NewInvoiceItem};
use crate::ports::{
    InvoiceFilter, InvoiceNumberAllocator, InvoiceNumberAllocatorExt, InvoiceRecord, InvoiceStore,
};
use crate::report::RevenueReport;

/// Application service for invoices
pub struct InvoiceService {
    allocator: Arc<dyn InvoiceNumberAllocator>,
    store: Arc<dyn InvoiceStore>,
    defaults: InvoiceDefaults,
}

impl InvoiceService {
    /// Creates a service with the standard invoice defaults
    pub fn new(allocator: Arc<dyn InvoiceNumberAllocator>, store: Arc<dyn InvoiceStore>) -> Self {
        Self {
            allocator,
            store,
            defaults: InvoiceDefaults::default(),
        }
    }

    /// Overrides the defaults used for new drafts and the invoice currency
    pub fn with_defaults(mut self, defaults: InvoiceDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn defaults(&self) -> &InvoiceDefaults {
        &self.defaults
    }

    /// A blank draft pre-filled with the configured defaults
    pub fn new_draft(&self, today: NaiveDate) -> InvoiceDraft {
        InvoiceDraft::new(&self.defaults, today)
    }

    /// Live totals for rows being edited; blank rows are skipped
    ///
    /// `None` while the amounts are too large to compute.
    pub fn preview(&self, items: &[NewInvoiceItem]) -> Option<InvoiceCalculation> {
        let line_items: Vec<_> = items
            .iter()
            .filter(|item| !item.is_blank())
            .map(NewInvoiceItem::line_item)
            .collect();
        checked_calculate(&line_items)
    }

    /// Creates and saves a new invoice numbered within `year`
    ///
    /// The allocator is called once, after validation. If allocation fails
    /// nothing is written. If the save fails the allocated number stays
    /// consumed and will not be reused.
    ///
    /// # Errors
    ///
    /// - `InvoicingError::Validation` if the draft is incomplete
    /// - `InvoicingError::AllocationFailed` if no number could be allocated
    /// - `InvoicingError::Store` if the invoice could not be saved
    #[instrument(skip(self, draft, metadata), fields(correlation_id = ?metadata.correlation_id))]
    pub async fn create_invoice(
        &self,
        draft: InvoiceDraft,
        year: i32,
        metadata: OperationMetadata,
    ) -> Result<Invoice, InvoicingError> {
        let validated = draft.validate()?;
        debug!(items = validated.items.len(), "Draft validated");

        let number = match self.allocator.allocate(year).await {
            Ok(number) => number,
            Err(err) => {
                warn!(error = %err, "Invoice number allocation failed");
                return Err(err);
            }
        };

        let invoice = Invoice::new(
            number,
            validated.header,
            validated.items,
            self.defaults.currency,
            metadata.initiated_by,
        );

        if let Err(err) = self.store.insert_invoice(&invoice).await {
            warn!(invoice_number = %number, error = %err, "Saving invoice failed; number stays consumed");
            return Err(err.into());
        }

        info!(invoice_id = %invoice.id, invoice_number = %number, "Invoice created");
        Ok(invoice)
    }

    /// Replaces the header and items of an existing invoice
    ///
    /// The invoice number never changes.
    #[instrument(skip(self, draft), fields(invoice_id = %id))]
    pub async fn update_invoice(&self, id: InvoiceId, draft: InvoiceDraft) -> Result<Invoice, InvoicingError> {
        let mut invoice = self.load(id).await?.invoice;
        let validated = draft.validate()?;

        invoice.replace(validated.header, validated.items);
        self.store.update_invoice(&invoice).await?;

        info!(invoice_number = %invoice.number(), "Invoice updated");
        Ok(invoice)
    }

    /// Moves an invoice to another status
    #[instrument(skip(self), fields(invoice_id = %id))]
    pub async fn set_status(&self, id: InvoiceId, status: InvoiceStatus) -> Result<Invoice, InvoicingError> {
        let mut invoice = self.load(id).await?.invoice;
        invoice.set_status(status);
        self.store.update_invoice(&invoice).await?;

        info!(invoice_number = %invoice.number(), status = %status, "Invoice status changed");
        Ok(invoice)
    }

    /// Loads an invoice with its client name
    pub async fn get_invoice(&self, id: InvoiceId) -> Result<InvoiceRecord, InvoicingError> {
        self.load(id).await
    }

    /// Lists invoices, newest number first
    pub async fn list_invoices(&self, filter: &InvoiceFilter) -> Result<Vec<InvoiceRecord>, InvoicingError> {
        Ok(self.store.list_invoices(filter).await?)
    }

    /// Builds the revenue report for invoices issued in `[from, to]`
    #[instrument(skip(self))]
    pub async fn revenue_report(&self, from: NaiveDate, to: NaiveDate) -> Result<RevenueReport, InvoicingError> {
        let filter = InvoiceFilter::all().issued_between(from, to);
        let records = self.store.list_invoices(&filter).await?;
        debug!(invoices = records.len(), "Building revenue report");
        Ok(RevenueReport::build(&records, from, to))
    }

    async fn load(&self, id: InvoiceId) -> Result<InvoiceRecord, InvoicingError> {
        self.store.get_invoice(id).await.map_err(|err| {
            if err.is_not_found() {
                InvoicingError::InvoiceNotFound(id.to_string())
            } else {
                err.into()
            }
        })
    }
}
