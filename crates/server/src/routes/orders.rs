//! Order route handlers.
//!
//! Listing and detail are JSON for the dashboard script; the new-order form
//! is a page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Serialize;

use pedidos_core::OrderId;

use super::extract::JsonOrForm;
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{CurrentUser, Order, OrderSummary};
use crate::services::{OrderDraft, OrderService, access};
use crate::state::AppState;

/// New order page template.
#[derive(Template, WebTemplate)]
#[template(path = "new_order.html")]
pub struct NewOrderTemplate {
    pub user: CurrentUser,
}

/// Response to a successful order creation.
#[derive(Debug, Serialize)]
pub struct CreatedOrder {
    pub success: bool,
    pub order_id: OrderId,
}

/// List the orders visible to the current user, newest first.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<OrderSummary>>, AppError> {
    let orders = OrderService::new(state.pool()).list_orders(&user).await?;
    Ok(Json(orders))
}

/// Display the new order form (admins only).
pub async fn new_page(RequireAuth(user): RequireAuth) -> Result<impl IntoResponse, AppError> {
    if !access::can_create_order(&user) {
        return Err(AppError::Forbidden("only admins can create orders".to_string()));
    }

    Ok(NewOrderTemplate { user })
}

/// Create an order from a form or JSON body.
///
/// Non-admins are refused before the body is looked at.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    body: Result<JsonOrForm<OrderDraft>, AppError>,
) -> Result<Json<CreatedOrder>, AppError> {
    OrderService::authorize_create(&user)?;
    let JsonOrForm(draft) = body?;

    let order_id = OrderService::new(state.pool())
        .create_order(&user, draft)
        .await?;

    Ok(Json(CreatedOrder {
        success: true,
        order_id,
    }))
}

/// Show a single order.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>, AppError> {
    let order = OrderService::new(state.pool()).get_order(&user, id).await?;
    Ok(Json(order))
}
