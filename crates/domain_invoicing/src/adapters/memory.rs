//! In-memory implementations of the invoicing ports
//!
//! Used by tests and local runs without a database. The allocator holds its
//! per-year counters behind one mutex, so each increment is a single
//! critical section and concurrent callers always see distinct values.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use core_kernel::{
    AdapterHealth, ClientId, DomainPort, HealthCheckResult, HealthCheckable, InvoiceId, PortError,
};

use crate::error::InvoicingError;
use crate::invoice::Invoice;
use crate::ports::{InvoiceFilter, InvoiceNumberAllocator, InvoiceRecord, InvoiceStore};

/// Per-year counters kept in process memory
#[derive(Debug)]
pub struct InMemoryInvoiceNumberAllocator {
    counters: Arc<Mutex<HashMap<i32, u32>>>,
    available: AtomicBool,
}

impl Default for InMemoryInvoiceNumberAllocator {
    fn default() -> Self {
        Self {
            counters: Arc::default(),
            available: AtomicBool::new(true),
        }
    }
}

impl InMemoryInvoiceNumberAllocator {
    /// Creates an allocator with no counters; every year starts at 1
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an allocator whose counter for `year` already stands at `last_number`
    pub fn with_counter(year: i32, last_number: u32) -> Self {
        let mut counters = HashMap::new();
        counters.insert(year, last_number);
        Self {
            counters: Arc::new(Mutex::new(counters)),
            available: AtomicBool::new(true),
        }
    }

    /// Simulates the backing store going away (or coming back)
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Last number handed out for `year`, 0 if none
    pub async fn current(&self, year: i32) -> u32 {
        self.counters.lock().await.get(&year).copied().unwrap_or(0)
    }
}

impl DomainPort for InMemoryInvoiceNumberAllocator {}

#[async_trait]
impl HealthCheckable for InMemoryInvoiceNumberAllocator {
    async fn health_check(&self) -> HealthCheckResult {
        let status = if self.available.load(Ordering::SeqCst) {
            AdapterHealth::Healthy
        } else {
            AdapterHealth::Unhealthy
        };
        HealthCheckResult {
            adapter_id: "memory-invoice-number-allocator".to_string(),
            status,
            latency_ms: 0,
            message: None,
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl InvoiceNumberAllocator for InMemoryInvoiceNumberAllocator {
    async fn next_invoice_number(&self, year: i32) -> Result<u32, InvoicingError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(InvoicingError::allocation_failed(year, "counter store unavailable"));
        }

        let mut counters = self.counters.lock().await;
        let counter = counters.entry(year).or_insert(0);
        let next = counter
            .checked_add(1)
            .ok_or_else(|| InvoicingError::allocation_failed(year, "counter overflow"))?;
        *counter = next;

        debug!(year, number = next, "Allocated invoice number");
        Ok(next)
    }
}

/// Invoices kept in process memory
#[derive(Debug, Default)]
pub struct InMemoryInvoiceStore {
    invoices: Arc<RwLock<HashMap<InvoiceId, Invoice>>>,
    client_names: Arc<RwLock<HashMap<ClientId, String>>>,
    fail_writes: AtomicBool,
}

impl InMemoryInvoiceStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a client name used for search and reporting
    pub async fn register_client(&self, id: ClientId, name: impl Into<String>) {
        self.client_names.write().await.insert(id, name.into());
    }

    /// Makes subsequent inserts and updates fail with a connection error
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of stored invoices
    pub async fn len(&self) -> usize {
        self.invoices.read().await.len()
    }

    /// Returns true when nothing is stored
    pub async fn is_empty(&self) -> bool {
        self.invoices.read().await.is_empty()
    }

    fn check_writable(&self) -> Result<(), PortError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PortError::connection("invoice store unavailable"));
        }
        Ok(())
    }

    async fn record(&self, invoice: &Invoice) -> InvoiceRecord {
        let client_name = self
            .client_names
            .read()
            .await
            .get(&invoice.header.client_id)
            .cloned();
        InvoiceRecord::new(invoice.clone(), client_name)
    }
}

impl DomainPort for InMemoryInvoiceStore {}

#[async_trait]
impl HealthCheckable for InMemoryInvoiceStore {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult {
            adapter_id: "memory-invoice-store".to_string(),
            status: AdapterHealth::Healthy,
            latency_ms: 0,
            message: Some("In-memory store".to_string()),
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    async fn insert_invoice(&self, invoice: &Invoice) -> Result<(), PortError> {
        self.check_writable()?;

        let mut invoices = self.invoices.write().await;
        if invoices.values().any(|existing| existing.number() == invoice.number()) {
            return Err(PortError::conflict(format!(
                "invoice number {} already exists",
                invoice.number()
            )));
        }
        if invoices.contains_key(&invoice.id) {
            return Err(PortError::conflict(format!("invoice {} already exists", invoice.id)));
        }
        invoices.insert(invoice.id, invoice.clone());
        Ok(())
    }

    async fn update_invoice(&self, invoice: &Invoice) -> Result<(), PortError> {
        self.check_writable()?;

        let mut invoices = self.invoices.write().await;
        let existing = invoices
            .get_mut(&invoice.id)
            .ok_or_else(|| PortError::not_found("Invoice", invoice.id))?;
        if existing.number() != invoice.number() {
            return Err(PortError::validation_field(
                "invoice number cannot change",
                "invoice_number",
            ));
        }
        *existing = invoice.clone();
        Ok(())
    }

    async fn get_invoice(&self, id: InvoiceId) -> Result<InvoiceRecord, PortError> {
        let invoice = self
            .invoices
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Invoice", id))?;
        Ok(self.record(&invoice).await)
    }

    async fn list_invoices(&self, filter: &InvoiceFilter) -> Result<Vec<InvoiceRecord>, PortError> {
        let invoices: Vec<Invoice> = self.invoices.read().await.values().cloned().collect();
        let mut records = Vec::with_capacity(invoices.len());
        for invoice in &invoices {
            records.push(self.record(invoice).await);
        }
        Ok(filter.apply(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_years_start_at_one() {
        let allocator = InMemoryInvoiceNumberAllocator::new();

        assert_eq!(allocator.next_invoice_number(2024).await.unwrap(), 1);
        assert_eq!(allocator.next_invoice_number(2024).await.unwrap(), 2);
        assert_eq!(allocator.next_invoice_number(2025).await.unwrap(), 1);
        assert_eq!(allocator.current(2024).await, 2);
    }

    #[tokio::test]
    async fn test_unavailable_store_fails() {
        let allocator = InMemoryInvoiceNumberAllocator::with_counter(2024, 5);
        allocator.set_available(false);

        let err = allocator.next_invoice_number(2024).await.unwrap_err();
        assert!(err.is_allocation_failure());
        // nothing consumed
        assert_eq!(allocator.current(2024).await, 5);

        allocator.set_available(true);
        assert_eq!(allocator.next_invoice_number(2024).await.unwrap(), 6);
    }

    #[tokio::test]
    async fn test_counter_overflow_is_an_allocation_failure() {
        let allocator = InMemoryInvoiceNumberAllocator::with_counter(2024, u32::MAX);
        let err = allocator.next_invoice_number(2024).await.unwrap_err();
        assert!(err.is_allocation_failure());
    }
}
