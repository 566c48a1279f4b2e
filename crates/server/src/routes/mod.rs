//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Redirect to dashboard or login
//! GET  /health                    - Liveness check
//! GET  /health/ready              - Readiness check (database)
//!
//! # Auth
//! GET  /login                     - Login page
//! POST /login                     - Login action
//! GET  /logout                    - Logout action
//!
//! # Dashboard (requires auth)
//! GET  /dashboard                 - Order tabs and chat links
//!
//! # Orders (requires auth)
//! GET  /orders                    - JSON list, filtered by role
//! GET  /orders/new                - New order form (admin)
//! POST /orders/new                - Create order (admin)
//! GET  /orders/{id}               - JSON order detail
//!
//! # Chat (requires auth and order access)
//! GET  /chat/{id}                 - Chat page
//! GET  /chat/{id}/messages        - JSON message list
//! POST /chat/{id}/messages        - Post a message
//! ```

pub mod auth;
pub mod chat;
pub mod dashboard;
pub mod extract;
pub mod orders;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::get,
};

use crate::state::AppState;

/// Create the application router (without middleware or static files).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(auth::index))
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/dashboard", get(dashboard::show))
        .route("/orders", get(orders::list))
        .route("/orders/new", get(orders::new_page).post(orders::create))
        .route("/orders/{id}", get(orders::show))
        .route("/chat/{id}", get(chat::show))
        .route("/chat/{id}/messages", get(chat::list).post(chat::post))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
