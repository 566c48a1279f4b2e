//! Chat message domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use pedidos_core::{MessageId, OrderId, UserId};

/// A message in an order's thread, joined with its author's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    /// Unique message ID.
    pub id: MessageId,
    /// Order whose thread this message belongs to.
    pub order_id: OrderId,
    /// Author.
    pub user_id: UserId,
    /// Display name of the author.
    pub author_name: String,
    /// Message body.
    pub text: String,
    /// When the message was stored.
    pub created_at: DateTime<Utc>,
}
