//! PostgreSQL Invoice Store
//!
//! Implements `InvoiceStore` with the `InvoiceRepository`, translating
//! between domain invoices and table rows.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{
    AdapterHealth, ClientId, Currency, DomainPort, HealthCheckResult, HealthCheckable, InvoiceId,
    InvoiceItemId, PortError, ProductId,
};
use domain_invoicing::{
    Invoice, InvoiceFilter, InvoiceHeader, InvoiceItem, InvoiceNumber, InvoiceRecord, InvoiceStore,
};

use crate::error::DatabaseError;
use crate::repositories::{InvoiceItemRow, InvoiceQuery, InvoiceRepository, InvoiceRow, InvoiceWithItems};

/// PostgreSQL-backed implementation of the InvoiceStore port
///
/// # Error Handling
///
/// - a taken (year, number) pair -> `PortError::Conflict`
/// - missing invoice -> `PortError::NotFound`
/// - connection problems -> `PortError::Connection` / `PortError::Timeout`
/// - anything else -> `PortError::Internal`
#[derive(Debug, Clone)]
pub struct PostgresInvoiceStore {
    repository: InvoiceRepository,
    pool: PgPool,
}

impl PostgresInvoiceStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: InvoiceRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresInvoiceStore {}

#[async_trait]
impl HealthCheckable for PostgresInvoiceStore {
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();
        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => HealthCheckResult {
                adapter_id: "postgres-invoice-store".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms,
                message: None,
                checked_at: Utc::now(),
            },
            Err(e) => HealthCheckResult {
                adapter_id: "postgres-invoice-store".to_string(),
                status: AdapterHealth::Unhealthy,
                latency_ms,
                message: Some(format!("Database error: {}", e)),
                checked_at: Utc::now(),
            },
        }
    }
}

#[async_trait]
impl InvoiceStore for PostgresInvoiceStore {
    #[instrument(skip(self, invoice), fields(invoice_id = %invoice.id, invoice_number = %invoice.number()))]
    async fn insert_invoice(&self, invoice: &Invoice) -> Result<(), PortError> {
        debug!(items = invoice.items().len(), "Inserting invoice");
        let (row, items) = invoice_to_rows(invoice)?;
        self.repository.insert(&row, &items).await.map_err(|e| match e {
            DatabaseError::DuplicateEntry(_) => {
                PortError::conflict(format!("invoice number {} already exists", invoice.number()))
            }
            other => other.into(),
        })
    }

    #[instrument(skip(self, invoice), fields(invoice_id = %invoice.id))]
    async fn update_invoice(&self, invoice: &Invoice) -> Result<(), PortError> {
        let (row, items) = invoice_to_rows(invoice)?;
        self.repository.update(&row, &items).await.map_err(|e| match e {
            DatabaseError::NotFound(_) => PortError::not_found("Invoice", invoice.id),
            other => other.into(),
        })
    }

    #[instrument(skip(self), fields(invoice_id = %id))]
    async fn get_invoice(&self, id: InvoiceId) -> Result<InvoiceRecord, PortError> {
        debug!("Fetching invoice");
        let data = self.repository.get(*id.as_uuid()).await.map_err(|e| match e {
            DatabaseError::NotFound(_) => PortError::not_found("Invoice", id),
            other => other.into(),
        })?;
        rows_to_record(data)
    }

    #[instrument(skip(self))]
    async fn list_invoices(&self, filter: &InvoiceFilter) -> Result<Vec<InvoiceRecord>, PortError> {
        let query = InvoiceQuery {
            status: filter.status.map(|s| s.as_str().to_string()),
            issued_from: filter.issued_from,
            issued_to: filter.issued_to,
        };
        let rows = self.repository.list(&query).await?;

        let records = rows
            .into_iter()
            .map(rows_to_record)
            .collect::<Result<Vec<_>, _>>()?;

        // search matches the formatted number, so it runs on domain values
        Ok(filter.apply(records))
    }
}

fn invoice_to_rows(invoice: &Invoice) -> Result<(InvoiceRow, Vec<InvoiceItemRow>), PortError> {
    let header = &invoice.header;
    let number = invoice.number();
    let invoice_id = *invoice.id.as_uuid();
    let invoice_number = i32::try_from(number.number()).map_err(|_| {
        PortError::validation_field(
            format!("invoice number {} does not fit the invoices table", number),
            "invoice_number",
        )
    })?;

    let row = InvoiceRow {
        invoice_id,
        invoice_number,
        invoice_year: number.year(),
        client_id: *header.client_id.as_uuid(),
        issue_date: header.issue_date,
        issue_place: header.issue_place.clone(),
        traffic_date: header.traffic_date,
        traffic_place: header.traffic_place.clone(),
        due_date: header.due_date,
        payment_method: header.payment_method.as_str().to_string(),
        status: header.status.as_str().to_string(),
        currency: invoice.currency.code().to_string(),
        created_at: invoice.created_at,
        created_by: invoice.created_by.clone(),
        client_name: None,
    };

    let items = invoice
        .items()
        .iter()
        .map(|item| {
            let sort_order = i32::try_from(item.sort_order).map_err(|_| {
                PortError::validation_field(format!("item position {} out of range", item.sort_order), "sort_order")
            })?;
            Ok(InvoiceItemRow {
                item_id: *item.id.as_uuid(),
                invoice_id,
                product_id: item.product_id.map(|p| *p.as_uuid()),
                product_name: item.product_name.clone(),
                quantity: item.quantity,
                unit: item.unit.clone(),
                unit_price: item.unit_price,
                discount_percent: item.discount_percent,
                vat_rate: item.vat_rate,
                sort_order,
            })
        })
        .collect::<Result<Vec<_>, PortError>>()?;

    Ok((row, items))
}

fn rows_to_record(data: InvoiceWithItems) -> Result<InvoiceRecord, PortError> {
    let row = data.invoice;

    let number = u32::try_from(row.invoice_number)
        .ok()
        .and_then(|n| InvoiceNumber::new(n, row.invoice_year).ok())
        .ok_or_else(|| invalid_data("invoice_number", row.invoice_number))?;
    let payment_method = row
        .payment_method
        .parse()
        .map_err(|_| invalid_data("payment_method", &row.payment_method))?;
    let status = row
        .status
        .parse()
        .map_err(|_| invalid_data("status", &row.status))?;
    let currency: Currency = row
        .currency
        .parse()
        .map_err(|_| invalid_data("currency", &row.currency))?;

    let header = InvoiceHeader {
        client_id: ClientId::from_uuid(row.client_id),
        issue_date: row.issue_date,
        issue_place: row.issue_place,
        traffic_date: row.traffic_date,
        traffic_place: row.traffic_place,
        due_date: row.due_date,
        payment_method,
        status,
    };

    let items = data
        .items
        .into_iter()
        .map(|item| {
            let sort_order =
                u32::try_from(item.sort_order).map_err(|_| invalid_data("sort_order", item.sort_order))?;
            Ok(InvoiceItem {
                id: InvoiceItemId::from_uuid(item.item_id),
                product_id: item.product_id.map(ProductId::from_uuid),
                product_name: item.product_name,
                quantity: item.quantity,
                unit: item.unit,
                unit_price: item.unit_price,
                discount_percent: item.discount_percent,
                vat_rate: item.vat_rate,
                sort_order,
            })
        })
        .collect::<Result<Vec<_>, PortError>>()?;

    let invoice = Invoice::restore(
        InvoiceId::from_uuid(row.invoice_id),
        number,
        header,
        currency,
        items,
        row.created_at,
        row.created_by,
    );

    Ok(InvoiceRecord::new(invoice, row.client_name))
}

fn invalid_data(column: &str, value: impl std::fmt::Display) -> PortError {
    PortError::from(DatabaseError::InvalidData(format!("{} = '{}'", column, value)))
}
