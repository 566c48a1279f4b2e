//! Unified error handling for the order desk.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{AuthError, ChatError, OrderError};

/// Application-level error type.
///
/// Every handler failure funnels through here and is rendered as a JSON
/// body `{"error": ...}`, plus `"field"` for validation errors.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User lacks permission.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A submitted field is missing or invalid.
    #[error("{message}")]
    Validation { field: String, message: String },

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound(id) => Self::NotFound(format!("order {id}")),
            OrderError::Forbidden(reason) => Self::Forbidden(reason.to_string()),
            OrderError::Validation { field, message } => Self::Validation {
                field: field.to_string(),
                message,
            },
            OrderError::Repository(e) => Self::Database(e),
        }
    }
}

impl From<ChatError> for AppError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::Order(e) => e.into(),
            ChatError::EmptyMessage => Self::Validation {
                field: "text".to_string(),
                message: err.to_string(),
            },
            ChatError::Repository(e) => Self::Database(e),
        }
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(e) => match e {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::InvalidEmail(_) | AuthError::Validation(_) => StatusCode::BAD_REQUEST,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Log server errors with Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let body = match &self {
            _ if status.is_server_error() => json!({ "error": "Internal server error" }),
            Self::Auth(AuthError::InvalidCredentials) => json!({ "error": "Invalid credentials" }),
            Self::Validation { field, message } => json!({ "error": message, "field": field }),
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Set the Sentry user context for the rest of the request.
pub fn set_sentry_user(user_id: i64, username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            username: Some(username.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use pedidos_core::OrderId;

    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("order 123".to_string());
        assert_eq!(err.to_string(), "Not found: order 123");

        let err = AppError::Forbidden("no access to this order".to_string());
        assert_eq!(err.to_string(), "Forbidden: no access to this order");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Forbidden("test".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::UserAlreadyExists)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_order_errors_keep_not_found_and_forbidden_apart() {
        let not_found: AppError = OrderError::NotFound(OrderId::new(9)).into();
        let forbidden: AppError = OrderError::Forbidden("no access to this order").into();

        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(forbidden.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_validation_body_names_field() {
        let err: AppError = ChatError::EmptyMessage.into();
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["field"], "text");
        assert_eq!(body["error"], "message text is required");
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let err = AppError::Internal("disk on fire at /var/lib/pedidos".to_string());
        let body = body_json(err.into_response()).await;

        assert_eq!(body["error"], "Internal server error");
    }

    #[tokio::test]
    async fn test_invalid_credentials_body_is_generic() {
        let body = body_json(AppError::Auth(AuthError::InvalidCredentials).into_response()).await;
        assert_eq!(body, json!({ "error": "Invalid credentials" }));
    }
}
