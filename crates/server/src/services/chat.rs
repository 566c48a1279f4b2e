//! Per-order chat threads.

use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, warn};

use pedidos_core::OrderId;

use super::access;
use super::orders::OrderError;
use crate::db::{MessageRepository, OrderRepository, RepositoryError};
use crate::models::{CurrentUser, Message, Order};

/// Errors from chat operations.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The parent order is missing or not accessible.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// The message text is empty or whitespace.
    #[error("message text is required")]
    EmptyMessage,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// An order together with its messages, oldest first.
#[derive(Debug, Clone)]
pub struct Thread {
    pub order: Order,
    pub messages: Vec<Message>,
}

/// Chat service.
pub struct ChatService<'a> {
    orders: OrderRepository<'a>,
    messages: MessageRepository<'a>,
}

impl<'a> ChatService<'a> {
    /// Create a new chat service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            orders: OrderRepository::new(pool),
            messages: MessageRepository::new(pool),
        }
    }

    /// Load an order, then let `allowed` decide whether `user` may use it.
    async fn load_order(
        &self,
        user: &CurrentUser,
        order_id: OrderId,
        allowed: fn(&CurrentUser, &Order) -> bool,
    ) -> Result<Order, ChatError> {
        let order = self
            .orders
            .get_by_id(order_id)
            .await?
            .ok_or(OrderError::NotFound(order_id))?;

        if !allowed(user, &order) {
            warn!(order_id = %order_id, user_id = %user.id, "Chat access denied");
            return Err(OrderError::Forbidden("no access to this order").into());
        }

        Ok(order)
    }

    /// Load an order and its thread for the chat page.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Order` if the order is missing or not accessible.
    /// Returns `ChatError::Repository` if a query fails.
    pub async fn open_thread(
        &self,
        user: &CurrentUser,
        order_id: OrderId,
    ) -> Result<Thread, ChatError> {
        let order = self
            .load_order(user, order_id, access::can_access_order)
            .await?;
        let messages = self.messages.list_by_order(order.id).await?;

        Ok(Thread { order, messages })
    }

    /// Messages of an order's thread, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Order` if the order is missing or not accessible.
    /// Returns `ChatError::Repository` if the query fails.
    pub async fn list_messages(
        &self,
        user: &CurrentUser,
        order_id: OrderId,
    ) -> Result<Vec<Message>, ChatError> {
        let order = self
            .load_order(user, order_id, access::can_access_order)
            .await?;
        let messages = self.messages.list_by_order(order.id).await?;
        Ok(messages)
    }

    /// The order whose thread `user` is about to post to.
    ///
    /// Runs before the message body is even decoded, so a missing order is
    /// `NotFound` and someone else's order is `Forbidden` whatever was sent.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Order` if the order is missing or `user` may not post.
    /// Returns `ChatError::Repository` if the query fails.
    pub async fn writable_order(
        &self,
        user: &CurrentUser,
        order_id: OrderId,
    ) -> Result<Order, ChatError> {
        self.load_order(user, order_id, access::can_post_message)
            .await
    }

    /// Append a message from `user` to the thread of `order`.
    ///
    /// `order` comes from [`Self::writable_order`]. Surrounding whitespace is
    /// stripped.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::EmptyMessage` if the text is blank.
    /// Returns `ChatError::Repository` if the insert fails.
    pub async fn post_message(
        &self,
        user: &CurrentUser,
        order: &Order,
        text: &str,
    ) -> Result<Message, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let message = self.messages.append(order.id, user.id, text).await?;

        debug!(order_id = %order.id, message_id = %message.id, "Message posted");
        Ok(message)
    }
}
