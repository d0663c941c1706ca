//! Invoice number counter repository
//!
//! One row per fiscal year in `invoice_counters`. The increment is a single
//! `INSERT ... ON CONFLICT DO UPDATE ... RETURNING` statement, which
//! PostgreSQL applies atomically under the row lock: concurrent callers for
//! the same year queue on that row and each one reads back its own value.

use sqlx::PgPool;

use crate::error::DatabaseError;

/// Repository for the per-year invoice counters
#[derive(Debug, Clone)]
pub struct InvoiceCounterRepository {
    pool: PgPool,
}

impl InvoiceCounterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Atomically advances the counter for `year` and returns the new value
    ///
    /// The first call for a year creates the row and returns 1.
    pub async fn next_number(&self, year: i32) -> Result<i32, DatabaseError> {
        let number = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO invoice_counters (year, last_number)
            VALUES ($1, 1)
            ON CONFLICT (year)
            DO UPDATE SET last_number = invoice_counters.last_number + 1
            RETURNING last_number
            "#,
        )
        .bind(year)
        .fetch_one(&self.pool)
        .await?;

        Ok(number)
    }

    /// Last number issued for `year`, 0 when none
    pub async fn current(&self, year: i32) -> Result<i32, DatabaseError> {
        let number = sqlx::query_scalar::<_, i32>(
            "SELECT last_number FROM invoice_counters WHERE year = $1",
        )
        .bind(year)
        .fetch_optional(&self.pool)
        .await?;

        Ok(number.unwrap_or(0))
    }

    /// Raises the counter for `year` to at least `last_number`
    ///
    /// Used when taking over an existing sequence. Never lowers the counter,
    /// so numbers already issued cannot be handed out again. Returns the
    /// counter after the update.
    pub async fn seed(&self, year: i32, last_number: i32) -> Result<i32, DatabaseError> {
        if last_number < 0 {
            return Err(DatabaseError::ConstraintViolation(format!(
                "counter for {} cannot be negative (got {})",
                year, last_number
            )));
        }

        let number = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO invoice_counters (year, last_number)
            VALUES ($1, $2)
            ON CONFLICT (year)
            DO UPDATE SET last_number = GREATEST(invoice_counters.last_number, EXCLUDED.last_number)
            RETURNING last_number
            "#,
        )
        .bind(year)
        .bind(last_number)
        .fetch_one(&self.pool)
        .await?;

        Ok(number)
    }

    /// Highest invoice number actually stored for `year`, 0 when none
    ///
    /// Seeding from this value realigns a counter with existing invoices.
    pub async fn max_stored_number(&self, year: i32) -> Result<i32, DatabaseError> {
        let number = sqlx::query_scalar::<_, Option<i32>>(
            "SELECT MAX(invoice_number) FROM invoices WHERE invoice_year = $1",
        )
        .bind(year)
        .fetch_one(&self.pool)
        .await?;

        Ok(number.unwrap_or(0))
    }
}
