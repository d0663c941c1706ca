//! PostgreSQL Invoice Number Allocator
//!
//! Implements `InvoiceNumberAllocator` on top of the `invoice_counters`
//! table. Each allocation is one atomic upsert; the application never reads
//! the counter and writes it back.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_invoicing::{InvoiceNumberAllocator, InvoiceNumberAllocatorExt};
//! use infra_db::adapters::PostgresInvoiceNumberAllocator;
//! use std::sync::Arc;
//!
//! let allocator: Arc<dyn InvoiceNumberAllocator> = Arc::new(PostgresInvoiceNumberAllocator::new(pool));
//! let number = allocator.allocate(2024).await?;
//! ```

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{error, info, instrument};

use core_kernel::{AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable};
use domain_invoicing::{InvoiceNumberAllocator, InvoicingError};

use crate::error::DatabaseError;
use crate::repositories::InvoiceCounterRepository;

/// PostgreSQL-backed invoice number allocator
///
/// # Error Handling
///
/// Every failure (connection, pool timeout, serialization conflict, a
/// counter that is not positive) becomes `InvoicingError::AllocationFailed`.
/// No retry is attempted beyond what the pool itself does.
#[derive(Debug, Clone)]
pub struct PostgresInvoiceNumberAllocator {
    repository: InvoiceCounterRepository,
    pool: PgPool,
}

impl PostgresInvoiceNumberAllocator {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: InvoiceCounterRepository::new(pool.clone()),
            pool,
        }
    }

    /// Last number issued for `year` without consuming one
    pub async fn current_counter(&self, year: i32) -> Result<u32, DatabaseError> {
        let current = self.repository.current(year).await?;
        u32::try_from(current)
            .map_err(|_| DatabaseError::InvalidData(format!("negative counter {} for {}", current, year)))
    }

    /// Raises the counter for `year` to at least `last_number`
    pub async fn seed_counter(&self, year: i32, last_number: u32) -> Result<u32, DatabaseError> {
        let last_number = i32::try_from(last_number)
            .map_err(|_| DatabaseError::ConstraintViolation(format!("counter {} out of range", last_number)))?;
        let seeded = self.repository.seed(year, last_number).await?;
        u32::try_from(seeded)
            .map_err(|_| DatabaseError::InvalidData(format!("negative counter {} for {}", seeded, year)))
    }

    /// Raises the counter for `year` to the highest invoice number stored for it
    ///
    /// Used after invoices were imported with their numbers already set.
    #[instrument(skip(self))]
    pub async fn resync_counter(&self, year: i32) -> Result<u32, DatabaseError> {
        let stored = self.repository.max_stored_number(year).await?;
        let stored = u32::try_from(stored)
            .map_err(|_| DatabaseError::InvalidData(format!("negative invoice number {} for {}", stored, year)))?;
        let current = self.seed_counter(year, stored).await?;
        if current > stored {
            info!(stored, current, "Counter is ahead of stored invoices");
        }
        Ok(current)
    }
}

impl DomainPort for PostgresInvoiceNumberAllocator {}

#[async_trait]
impl HealthCheckable for PostgresInvoiceNumberAllocator {
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;
        let (status, message) = match result {
            Ok(_) => (AdapterHealth::Healthy, None),
            Err(e) => (AdapterHealth::Unhealthy, Some(format!("Database error: {}", e))),
        };

        HealthCheckResult {
            adapter_id: "postgres-invoice-number-allocator".to_string(),
            status,
            latency_ms,
            message,
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl InvoiceNumberAllocator for PostgresInvoiceNumberAllocator {
    #[instrument(skip(self))]
    async fn next_invoice_number(&self, year: i32) -> Result<u32, InvoicingError> {
        let number = self.repository.next_number(year).await.map_err(|e| {
            error!(error = %e, retryable = e.is_retryable(), "Counter increment failed");
            InvoicingError::allocation_failed(year, e.to_string())
        })?;

        let number = u32::try_from(number)
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                error!(counter = number, "Counter returned a non-positive value");
                InvoicingError::allocation_failed(year, format!("counter returned {}", number))
            })?;

        info!(number, "Allocated invoice number");
        Ok(number)
    }
}
