//! Order domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use pedidos_core::{OrderId, UserId};

/// Status assigned to every new order.
///
/// No operation changes it afterwards.
pub const DEFAULT_ORDER_STATUS: &str = "pending";

/// An order as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Client the order is for.
    pub client: String,
    /// Free-text list of items.
    pub items: String,
    /// Optional notes.
    pub notes: Option<String>,
    /// Workflow status, always "pending" in this version.
    pub status: String,
    /// Admin who created the order; also the order's owner.
    pub created_by: UserId,
    /// When the order was created.
    pub created_at: DateTime<Utc>,
}

/// An order joined with its creator's name, as returned by listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    #[serde(flatten)]
    pub order: Order,
    /// Display name of `order.created_by`.
    pub creator_name: String,
}

/// Validated input for creating an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub client: String,
    pub items: String,
    pub notes: Option<String>,
}
