//! Order chat route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Deserialize;

use pedidos_core::OrderId;

use super::extract::JsonOrForm;
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{CurrentUser, Message, Order};
use crate::services::ChatService;
use crate::state::AppState;

/// Posted message body.
#[derive(Debug, Deserialize)]
pub struct MessageForm {
    #[serde(default)]
    pub text: String,
}

/// Chat page template.
///
/// Renders the thread as it is now; `static/app.js` polls for new messages.
#[derive(Template, WebTemplate)]
#[template(path = "chat.html")]
pub struct ChatTemplate {
    pub user: CurrentUser,
    pub order: Order,
    pub messages: Vec<Message>,
}

/// Display an order's chat page.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(order_id): Path<OrderId>,
) -> Result<impl IntoResponse, AppError> {
    let thread = ChatService::new(state.pool())
        .open_thread(&user, order_id)
        .await?;

    Ok(ChatTemplate {
        user,
        order: thread.order,
        messages: thread.messages,
    })
}

/// List an order's messages, oldest first.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(order_id): Path<OrderId>,
) -> Result<Json<Vec<Message>>, AppError> {
    let messages = ChatService::new(state.pool())
        .list_messages(&user, order_id)
        .await?;
    Ok(Json(messages))
}

/// Post a message to an order's thread.
///
/// The order must exist and be writable by `user` before the body is decoded.
pub async fn post(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(order_id): Path<OrderId>,
    body: Result<JsonOrForm<MessageForm>, AppError>,
) -> Result<Json<Message>, AppError> {
    let chat = ChatService::new(state.pool());
    let order = chat.writable_order(&user, order_id).await?;
    let JsonOrForm(form) = body?;

    let message = chat.post_message(&user, &order, &form.text).await?;
    Ok(Json(message))
}
