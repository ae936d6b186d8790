use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use super::{not_found, parse_id, TicketRepository};
use crate::core::error::{AppError, Result};
use crate::features::tickets::models::{NewTicket, Ticket};

const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS ticket (
    id BIGSERIAL PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL
)
"#;

/// Database row for the `ticket` table
#[derive(Debug, Clone, FromRow)]
struct TicketRow {
    id: i64,
    title: String,
    description: String,
    status: String,
}

impl From<TicketRow> for Ticket {
    fn from(row: TicketRow) -> Self {
        Self {
            id: row.id.to_string(),
            title: row.title,
            description: row.description,
            status: row.status,
        }
    }
}

/// Tickets in a single PostgreSQL table keyed by a `BIGSERIAL` id
pub struct PostgresTicketRepository {
    pool: PgPool,
}

impl PostgresTicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `ticket` table when it does not exist yet
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(CREATE_TABLE_SQL)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create ticket table: {:?}", e);
                AppError::from(e)
            })?;
        Ok(())
    }
}

#[async_trait]
impl TicketRepository for PostgresTicketRepository {
    async fn find_all(&self) -> Result<Vec<Ticket>> {
        let rows = sqlx::query_as::<_, TicketRow>(
            r#"
            SELECT id, title, description, status
            FROM ticket
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list tickets: {:?}", e);
            AppError::from(e)
        })?;

        Ok(rows.into_iter().map(Ticket::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Ticket> {
        // Only a plain decimal id can match a BIGSERIAL key
        let key = parse_id(id)
            .and_then(|n| i64::try_from(n).ok())
            .ok_or_else(|| not_found(id))?;

        let row = sqlx::query_as::<_, TicketRow>(
            r#"
            SELECT id, title, description, status
            FROM ticket
            WHERE id = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get ticket by ID: {:?}", e);
            AppError::from(e)
        })?;

        row.map(Ticket::from).ok_or_else(|| not_found(id))
    }

    async fn create(&self, ticket: NewTicket) -> Result<Ticket> {
        let row = sqlx::query_as::<_, TicketRow>(
            r#"
            INSERT INTO ticket (title, description, status)
            VALUES ($1, $2, $3)
            RETURNING id, title, description, status
            "#,
        )
        .bind(&ticket.title)
        .bind(&ticket.description)
        .bind(&ticket.status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create ticket: {:?}", e);
            AppError::from(e)
        })?;

        tracing::info!("Ticket created: id={}, backend=postgres", row.id);

        Ok(row.into())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
