//! CLI subcommands.

pub mod bootstrap;
pub mod migrate;
pub mod user;

use sqlx::SqlitePool;
use thiserror::Error;

use pedidos_server::config::{ConfigError, ServerConfig};
use pedidos_server::db;
use pedidos_server::services::AuthError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: admin, user")]
    InvalidRole(String),

    /// Account operation failed.
    #[error("{0}")]
    Auth(#[from] AuthError),
}

/// Load configuration and open a migrated pool.
async fn connect() -> Result<(ServerConfig, SqlitePool), CommandError> {
    let config = ServerConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;

    Ok((config, pool))
}
