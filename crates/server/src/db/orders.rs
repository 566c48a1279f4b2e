//! Order repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use pedidos_core::{OrderId, UserId};

use super::RepositoryError;
use crate::models::{DEFAULT_ORDER_STATUS, NewOrder, Order, OrderSummary};

/// Which orders a listing may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderFilter {
    /// Every order.
    All,
    /// Only orders created by this user.
    CreatedBy(UserId),
}

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    client: String,
    items: String,
    notes: Option<String>,
    status: String,
    created_by: UserId,
    created_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            client: row.client,
            items: row.items,
            notes: row.notes,
            status: row.status,
            created_by: row.created_by,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderSummaryRow {
    #[sqlx(flatten)]
    order: OrderRow,
    creator_name: String,
}

impl From<OrderSummaryRow> for OrderSummary {
    fn from(row: OrderSummaryRow) -> Self {
        Self {
            order: row.order.into(),
            creator_name: row.creator_name,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert an order with status "pending", stamped with the current time.
    ///
    /// The new id comes back from the insert statement itself, so it is
    /// correct even with concurrent writers.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if `created_by` is not an existing user.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        order: &NewOrder,
        created_by: UserId,
    ) -> Result<OrderId, RepositoryError> {
        let id = sqlx::query_scalar::<_, OrderId>(
            r"
            INSERT INTO orders (client, items, notes, status, created_by, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            ",
        )
        .bind(&order.client)
        .bind(&order.items)
        .bind(order.notes.as_deref())
        .bind(DEFAULT_ORDER_STATUS)
        .bind(created_by)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::NotFound;
            }
            RepositoryError::Database(e)
        })?;

        Ok(id)
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, client, items, notes, status, created_by, created_at
            FROM orders
            WHERE id = ?
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// List orders joined with their creator's name, newest first.
    ///
    /// Ties on `created_at` are broken by id, highest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: OrderFilter) -> Result<Vec<OrderSummary>, RepositoryError> {
        let rows = match filter {
            OrderFilter::All => {
                sqlx::query_as::<_, OrderSummaryRow>(
                    r"
                    SELECT o.id, o.client, o.items, o.notes, o.status, o.created_by, o.created_at,
                           u.name AS creator_name
                    FROM orders o
                    JOIN users u ON u.id = o.created_by
                    ORDER BY o.created_at DESC, o.id DESC
                    ",
                )
                .fetch_all(self.pool)
                .await?
            }
            OrderFilter::CreatedBy(user_id) => {
                sqlx::query_as::<_, OrderSummaryRow>(
                    r"
                    SELECT o.id, o.client, o.items, o.notes, o.status, o.created_by, o.created_at,
                           u.name AS creator_name
                    FROM orders o
                    JOIN users u ON u.id = o.created_by
                    WHERE o.created_by = ?
                    ORDER BY o.created_at DESC, o.id DESC
                    ",
                )
                .bind(user_id)
                .fetch_all(self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
