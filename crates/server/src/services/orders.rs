//! Order service.
//!
//! Puts the access policy in front of the order repository. Every operation
//! takes the request's [`CurrentUser`] explicitly.

use serde::Deserialize;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{info, warn};

use pedidos_core::OrderId;

use super::access;
use crate::db::{OrderRepository, RepositoryError};
use crate::models::{CurrentUser, NewOrder, Order, OrderSummary};

/// Errors from order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// No order with this id.
    #[error("order {0} not found")]
    NotFound(OrderId),

    /// The user may not perform this operation.
    #[error("{0}")]
    Forbidden(&'static str),

    /// A submitted field is missing or invalid.
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Order fields as submitted, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OrderDraft {
    pub client: String,
    pub items: String,
    pub notes: Option<String>,
}

impl OrderDraft {
    /// Check required fields and normalize whitespace.
    ///
    /// Blank notes become `None`.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Validation` naming the first empty required field.
    pub fn validate(self) -> Result<NewOrder, OrderError> {
        let client = required(&self.client, "client")?;
        let items = required(&self.items, "items")?;
        let notes = self
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        Ok(NewOrder {
            client,
            items,
            notes,
        })
    }
}

fn required(value: &str, field: &'static str) -> Result<String, OrderError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(OrderError::Validation {
            field,
            message: format!("{field} is required"),
        });
    }
    Ok(value.to_string())
}

/// Order service.
pub struct OrderService<'a> {
    orders: OrderRepository<'a>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            orders: OrderRepository::new(pool),
        }
    }

    /// Orders visible to `user`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the query fails.
    pub async fn list_orders(&self, user: &CurrentUser) -> Result<Vec<OrderSummary>, OrderError> {
        let orders = self.orders.list(access::order_filter(user)).await?;
        Ok(orders)
    }

    /// Check that `user` may create orders.
    ///
    /// Handlers call this before decoding the request body.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Forbidden` if `user` is not an admin.
    pub fn authorize_create(user: &CurrentUser) -> Result<(), OrderError> {
        if !access::can_create_order(user) {
            warn!(user_id = %user.id, "Non-admin attempted to create an order");
            return Err(OrderError::Forbidden("only admins can create orders"));
        }
        Ok(())
    }

    /// Create an order owned by `user`.
    ///
    /// Permission is checked before the draft is validated, so a non-admin
    /// always gets `Forbidden` and no row is written.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Forbidden` if `user` is not an admin.
    /// Returns `OrderError::Validation` if `client` or `items` is empty.
    /// Returns `OrderError::Repository` if the insert fails.
    pub async fn create_order(
        &self,
        user: &CurrentUser,
        draft: OrderDraft,
    ) -> Result<OrderId, OrderError> {
        Self::authorize_create(user)?;

        let order = draft.validate()?;
        let id = self.orders.create(&order, user.id).await?;

        info!(order_id = %id, user_id = %user.id, client = %order.client, "Order created");
        Ok(id)
    }

    /// Fetch an order `user` is allowed to see.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if the order does not exist.
    /// Returns `OrderError::Forbidden` if it exists but belongs to someone else.
    /// Returns `OrderError::Repository` if the query fails.
    pub async fn get_order(&self, user: &CurrentUser, id: OrderId) -> Result<Order, OrderError> {
        let order = self
            .orders
            .get_by_id(id)
            .await?
            .ok_or(OrderError::NotFound(id))?;

        if !access::can_access_order(user, &order) {
            warn!(order_id = %id, user_id = %user.id, "Order access denied");
            return Err(OrderError::Forbidden("no access to this order"));
        }

        Ok(order)
    }
}
