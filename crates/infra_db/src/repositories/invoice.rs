//! Invoice repository implementation
//!
//! Headers live in `invoices`, line items in `invoice_items`. Writes run in
//! one transaction with the header first, so an item row never exists
//! without its numbered invoice.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::DatabaseError;

const SELECT_INVOICES: &str = r#"
    SELECT i.invoice_id, i.invoice_number, i.invoice_year, i.client_id,
           i.issue_date, i.issue_place, i.traffic_date, i.traffic_place, i.due_date,
           i.payment_method, i.status, i.currency, i.created_at, i.created_by,
           c.name AS client_name
    FROM invoices i
    LEFT JOIN clients c ON c.client_id = i.client_id
"#;

/// Repository for invoices and their items
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: PgPool,
}

impl InvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a header and its items in one transaction
    ///
    /// # Errors
    ///
    /// `DatabaseError::DuplicateEntry` when the (year, number) pair is taken.
    pub async fn insert(&self, invoice: &InvoiceRow, items: &[InvoiceItemRow]) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO invoices (
                invoice_id, invoice_number, invoice_year, client_id,
                issue_date, issue_place, traffic_date, traffic_place, due_date,
                payment_method, status, currency, created_at, created_by
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(invoice.invoice_id)
        .bind(invoice.invoice_number)
        .bind(invoice.invoice_year)
        .bind(invoice.client_id)
        .bind(invoice.issue_date)
        .bind(&invoice.issue_place)
        .bind(invoice.traffic_date)
        .bind(&invoice.traffic_place)
        .bind(invoice.due_date)
        .bind(&invoice.payment_method)
        .bind(&invoice.status)
        .bind(&invoice.currency)
        .bind(invoice.created_at)
        .bind(&invoice.created_by)
        .execute(&mut *tx)
        .await?;

        insert_items(&mut tx, items).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Replaces header fields and all items of an existing invoice
    ///
    /// The number and year are part of the match, so they can never change.
    pub async fn update(&self, invoice: &InvoiceRow, items: &[InvoiceItemRow]) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE invoices SET
                client_id = $4, issue_date = $5, issue_place = $6,
                traffic_date = $7, traffic_place = $8, due_date = $9,
                payment_method = $10, status = $11
            WHERE invoice_id = $1 AND invoice_number = $2 AND invoice_year = $3
            "#,
        )
        .bind(invoice.invoice_id)
        .bind(invoice.invoice_number)
        .bind(invoice.invoice_year)
        .bind(invoice.client_id)
        .bind(invoice.issue_date)
        .bind(&invoice.issue_place)
        .bind(invoice.traffic_date)
        .bind(&invoice.traffic_place)
        .bind(invoice.due_date)
        .bind(&invoice.payment_method)
        .bind(&invoice.status)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Invoice", invoice.invoice_id));
        }

        sqlx::query("DELETE FROM invoice_items WHERE invoice_id = $1")
            .bind(invoice.invoice_id)
            .execute(&mut *tx)
            .await?;
        insert_items(&mut tx, items).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Loads one invoice with its items in `sort_order`
    pub async fn get(&self, invoice_id: Uuid) -> Result<InvoiceWithItems, DatabaseError> {
        let invoice = sqlx::query_as::<_, InvoiceRow>(&format!("{} WHERE i.invoice_id = $1", SELECT_INVOICES))
            .bind(invoice_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Invoice", invoice_id))?;

        let items = sqlx::query_as::<_, InvoiceItemRow>(
            r#"
            SELECT item_id, invoice_id, product_id, product_name, quantity, unit,
                   unit_price, discount_percent, vat_rate, sort_order
            FROM invoice_items
            WHERE invoice_id = $1
            ORDER BY sort_order
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(InvoiceWithItems { invoice, items })
    }

    /// Lists invoices by status and issue date range, newest number first
    pub async fn list(&self, query: &InvoiceQuery) -> Result<Vec<InvoiceWithItems>, DatabaseError> {
        let invoices = sqlx::query_as::<_, InvoiceRow>(&format!(
            r#"{}
            WHERE ($1::TEXT IS NULL OR i.status = $1)
              AND ($2::DATE IS NULL OR i.issue_date >= $2)
              AND ($3::DATE IS NULL OR i.issue_date <= $3)
            ORDER BY i.invoice_year DESC, i.invoice_number DESC
            "#,
            SELECT_INVOICES
        ))
        .bind(&query.status)
        .bind(query.issued_from)
        .bind(query.issued_to)
        .fetch_all(&self.pool)
        .await?;

        if invoices.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = invoices.iter().map(|i| i.invoice_id).collect();
        let item_rows = sqlx::query_as::<_, InvoiceItemRow>(
            r#"
            SELECT item_id, invoice_id, product_id, product_name, quantity, unit,
                   unit_price, discount_percent, vat_rate, sort_order
            FROM invoice_items
            WHERE invoice_id = ANY($1)
            ORDER BY invoice_id, sort_order
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut items_by_invoice: HashMap<Uuid, Vec<InvoiceItemRow>> = HashMap::new();
        for item in item_rows {
            items_by_invoice.entry(item.invoice_id).or_default().push(item);
        }

        Ok(invoices
            .into_iter()
            .map(|invoice| {
                let items = items_by_invoice.remove(&invoice.invoice_id).unwrap_or_default();
                InvoiceWithItems { invoice, items }
            })
            .collect())
    }
}

async fn insert_items(
    tx: &mut Transaction<'_, Postgres>,
    items: &[InvoiceItemRow],
) -> Result<(), DatabaseError> {
    for item in items {
        sqlx::query(
            r#"
            INSERT INTO invoice_items (
                item_id, invoice_id, product_id, product_name, quantity, unit,
                unit_price, discount_percent, vat_rate, sort_order
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(item.item_id)
        .bind(item.invoice_id)
        .bind(item.product_id)
        .bind(&item.product_name)
        .bind(item.quantity)
        .bind(&item.unit)
        .bind(item.unit_price)
        .bind(item.discount_percent)
        .bind(item.vat_rate)
        .bind(item.sort_order)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

/// Filters applied in SQL
#[derive(Debug, Clone, Default)]
pub struct InvoiceQuery {
    pub status: Option<String>,
    pub issued_from: Option<NaiveDate>,
    pub issued_to: Option<NaiveDate>,
}

/// Invoice header row
///
/// `client_name` is filled from the clients table on reads and ignored on writes.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InvoiceRow {
    pub invoice_id: Uuid,
    pub invoice_number: i32,
    pub invoice_year: i32,
    pub client_id: Uuid,
    pub issue_date: NaiveDate,
    pub issue_place: String,
    pub traffic_date: Option<NaiveDate>,
    pub traffic_place: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub payment_method: String,
    pub status: String,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub client_name: Option<String>,
}

/// Invoice line item row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InvoiceItemRow {
    pub item_id: Uuid,
    pub invoice_id: Uuid,
    pub product_id: Option<Uuid>,
    pub product_name: String,
    pub quantity: Decimal,
    pub unit: String,
    pub unit_price: Decimal,
    pub discount_percent: Decimal,
    pub vat_rate: Decimal,
    pub sort_order: i32,
}

/// A header with its items
#[derive(Debug, Clone)]
pub struct InvoiceWithItems {
    pub invoice: InvoiceRow,
    pub items: Vec<InvoiceItemRow>,
}
