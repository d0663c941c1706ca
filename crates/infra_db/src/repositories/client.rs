//! Client repository implementation

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use core_kernel::ClientId;
use domain_party::Client;

use crate::error::DatabaseError;

/// Repository for clients
#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a validated client
    ///
    /// # Errors
    ///
    /// `DatabaseError::ConstraintViolation` when the client fails validation
    /// or a column check.
    pub async fn insert(&self, client: &Client) -> Result<(), DatabaseError> {
        client
            .ensure_valid()
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO clients (
                client_id, name, pib, mb, address, city, delivery_location,
                email, phone, created_at, created_by
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(client.id.as_uuid())
        .bind(&client.name)
        .bind(&client.pib)
        .bind(&client.mb)
        .bind(&client.address)
        .bind(&client.city)
        .bind(&client.delivery_location)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(client.created_at)
        .bind(&client.created_by)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Loads a client by ID
    pub async fn get(&self, id: ClientId) -> Result<Client, DatabaseError> {
        let row = sqlx::query_as::<_, ClientRow>(
            r#"
            SELECT client_id, name, pib, mb, address, city, delivery_location,
                   email, phone, created_at, created_by
            FROM clients
            WHERE client_id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Client", id))?;

        Ok(row.into())
    }

    /// Clients whose name contains `term`, case-insensitive, sorted by name
    pub async fn search(&self, term: &str) -> Result<Vec<Client>, DatabaseError> {
        let rows = sqlx::query_as::<_, ClientRow>(
            r#"
            SELECT client_id, name, pib, mb, address, city, delivery_location,
                   email, phone, created_at, created_by
            FROM clients
            WHERE name ILIKE '%' || $1 || '%'
            ORDER BY name
            "#,
        )
        .bind(term)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Client::from).collect())
    }
}

/// Client row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ClientRow {
    pub client_id: Uuid,
    pub name: String,
    pub pib: String,
    pub mb: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub delivery_location: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<String>,
}

impl From<ClientRow> for Client {
    fn from(row: ClientRow) -> Self {
        Client {
            id: ClientId::from_uuid(row.client_id),
            name: row.name,
            pib: row.pib,
            mb: row.mb,
            address: row.address,
            city: row.city,
            delivery_location: row.delivery_location,
            email: row.email,
            phone: row.phone,
            created_at: row.created_at,
            created_by: row.created_by,
        }
    }
}
