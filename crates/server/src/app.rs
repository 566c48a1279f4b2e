//! Application assembly.
//!
//! Startup order is fixed: connect, migrate, bootstrap the admin, then build
//! the router. Nothing is served before the admin account exists.

use axum::Router;
use secrecy::ExposeSecret;
use thiserror::Error;
use tower_http::services::ServeDir;

use crate::config::ServerConfig;
use crate::db;
use crate::middleware::{create_session_layer, security_headers_middleware};
use crate::routes;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

/// Directory holding the dashboard script and stylesheet.
const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("database connection failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("admin bootstrap failed: {0}")]
    Bootstrap(#[from] AuthError),
}

/// Connect to the database, apply migrations and ensure the admin exists.
///
/// # Errors
///
/// Returns `StartupError` if any step fails.
pub async fn prepare(config: ServerConfig) -> Result<AppState, StartupError> {
    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    db::run_migrations(&pool).await?;
    tracing::info!("Migrations applied");

    if config.admin_password_is_default {
        tracing::warn!(
            "PEDIDOS_ADMIN_PASSWORD is not set; a newly bootstrapped admin gets the default password"
        );
    }
    AuthService::new(&pool)
        .bootstrap_admin(config.admin_password.expose_secret())
        .await?;

    Ok(AppState::new(config, pool))
}

/// Build the router with sessions, security headers and static files.
///
/// Tracing and Sentry layers are added by the binary.
///
/// # Errors
///
/// Returns `StartupError::Database` if the session table cannot be created.
pub async fn router(state: AppState) -> Result<Router, StartupError> {
    let session_layer = create_session_layer(state.pool(), state.config()).await?;

    Ok(Router::new()
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .with_state(state))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pedidos_core::Role;

    use super::*;
    use crate::db::UserRepository;

    #[tokio::test]
    async fn test_prepare_bootstraps_admin_once() {
        let state = prepare(ServerConfig::with_database_url("sqlite::memory:"))
            .await
            .unwrap();

        // A second bootstrap against the same database is a no-op.
        let created = AuthService::new(state.pool())
            .bootstrap_admin("123")
            .await
            .unwrap();
        assert!(!created);

        let admins = UserRepository::new(state.pool())
            .count_by_role(Role::Admin)
            .await
            .unwrap();
        assert_eq!(admins, 1);
    }

    #[tokio::test]
    async fn test_router_builds() {
        let state = prepare(ServerConfig::with_database_url("sqlite::memory:"))
            .await
            .unwrap();

        assert!(router(state).await.is_ok());
    }
}
