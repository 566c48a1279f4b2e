//! Message repository for order chat threads.
//!
//! Threads are append-only: there is no update or delete.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use pedidos_core::{MessageId, OrderId, UserId};

use super::RepositoryError;
use crate::models::Message;

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: MessageId,
    order_id: OrderId,
    user_id: UserId,
    author_name: String,
    text: String,
    created_at: DateTime<Utc>,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Self {
            id: row.id,
            order_id: row.order_id,
            user_id: row.user_id,
            author_name: row.author_name,
            text: row.text,
            created_at: row.created_at,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for chat message database operations.
pub struct MessageRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> MessageRepository<'a> {
    /// Create a new message repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Append a message to an order's thread and return it as stored.
    ///
    /// The insert and the read-back of the author's name run in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order or user does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn append(
        &self,
        order_id: OrderId,
        user_id: UserId,
        text: &str,
    ) -> Result<Message, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query_scalar::<_, MessageId>(
            r"
            INSERT INTO messages (order_id, user_id, text, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id
            ",
        )
        .bind(order_id)
        .bind(user_id)
        .bind(text)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::NotFound;
            }
            RepositoryError::Database(e)
        })?;

        let row = sqlx::query_as::<_, MessageRow>(
            r"
            SELECT m.id, m.order_id, m.user_id, u.name AS author_name, m.text, m.created_at
            FROM messages m
            JOIN users u ON u.id = m.user_id
            WHERE m.id = ?
            ",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// List an order's messages, oldest first.
    ///
    /// Messages stored in the same instant keep their insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_order(&self, order_id: OrderId) -> Result<Vec<Message>, RepositoryError> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r"
            SELECT m.id, m.order_id, m.user_id, u.name AS author_name, m.text, m.created_at
            FROM messages m
            JOIN users u ON u.id = m.user_id
            WHERE m.order_id = ?
            ORDER BY m.created_at ASC, m.id ASC
            ",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pedidos_core::Role;

    use super::*;
    use crate::db::OrderRepository;
    use crate::db::testing;
    use crate::models::NewOrder;

    async fn order_for(pool: &SqlitePool, creator: UserId) -> OrderId {
        OrderRepository::new(pool)
            .create(
                &NewOrder {
                    client: "Acme".to_string(),
                    items: "3x widget".to_string(),
                    notes: None,
                },
                creator,
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_append_returns_message_with_author() {
        let pool = testing::pool().await;
        let admin = testing::user(&pool, "Admin", "admin@sys.com", Role::Admin).await;
        let order = order_for(&pool, admin).await;

        let message = MessageRepository::new(&pool)
            .append(order, admin, "hello")
            .await
            .unwrap();

        assert_eq!(message.order_id, order);
        assert_eq!(message.user_id, admin);
        assert_eq!(message.author_name, "Admin");
        assert_eq!(message.text, "hello");
    }

    #[tokio::test]
    async fn test_thread_is_ordered_oldest_first() {
        let pool = testing::pool().await;
        let admin = testing::user(&pool, "Admin", "admin@sys.com", Role::Admin).await;
        let maria = testing::user(&pool, "Maria", "maria@example.com", Role::User).await;
        let order = order_for(&pool, admin).await;
        let messages = MessageRepository::new(&pool);

        messages.append(order, admin, "first").await.unwrap();
        messages.append(order, maria, "second").await.unwrap();
        let last = messages.append(order, admin, "third").await.unwrap();

        let thread = messages.list_by_order(order).await.unwrap();
        let texts: Vec<&str> = thread.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
        assert_eq!(thread[1].author_name, "Maria");
        assert_eq!(thread.last(), Some(&last));
    }

    #[tokio::test]
    async fn test_list_breaks_timestamp_ties_by_id() {
        let pool = testing::pool().await;
        let admin = testing::user(&pool, "Admin", "admin@sys.com", Role::Admin).await;
        let order = order_for(&pool, admin).await;

        for text in ["one", "two", "three"] {
            sqlx::query(
                "INSERT INTO messages (order_id, user_id, text, created_at) VALUES (?, ?, ?, '2025-03-01T10:00:00+00:00')",
            )
            .bind(order)
            .bind(admin)
            .bind(text)
            .execute(&pool)
            .await
            .unwrap();
        }

        let thread = MessageRepository::new(&pool)
            .list_by_order(order)
            .await
            .unwrap();

        let texts: Vec<&str> = thread.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
        assert!(thread.windows(2).all(|w| w[0].id.as_i64() < w[1].id.as_i64()));
        assert!(thread.iter().all(|m| m.created_at == thread[0].created_at));
    }

    #[tokio::test]
    async fn test_threads_are_separate_per_order() {
        let pool = testing::pool().await;
        let admin = testing::user(&pool, "Admin", "admin@sys.com", Role::Admin).await;
        let first = order_for(&pool, admin).await;
        let second = order_for(&pool, admin).await;
        let messages = MessageRepository::new(&pool);

        messages.append(first, admin, "for first").await.unwrap();

        assert_eq!(messages.list_by_order(first).await.unwrap().len(), 1);
        assert!(messages.list_by_order(second).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_to_missing_order_is_not_found() {
        let pool = testing::pool().await;
        let admin = testing::user(&pool, "Admin", "admin@sys.com", Role::Admin).await;

        let err = MessageRepository::new(&pool)
            .append(OrderId::new(99), admin, "hello")
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::NotFound));
    }
}
