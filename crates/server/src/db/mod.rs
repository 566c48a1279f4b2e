//! Database operations for the order desk `SQLite` database.
//!
//! ## Tables
//!
//! - `users` - Accounts (name, unique email, argon2 hash, role)
//! - `orders` - Orders created by admins for a client
//! - `messages` - Append-only chat messages attached to an order
//! - `tower_sessions` - Session storage, created by the session store
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/`, embedded at compile
//! time and applied on server start, or explicitly via:
//! ```bash
//! cargo run -p pedidos-cli -- migrate
//! ```

pub mod messages;
pub mod orders;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

pub use messages::MessageRepository;
pub use orders::{OrderFilter, OrderRepository};
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Map a unique-constraint violation to `RepositoryError::Conflict`.
pub(crate) fn conflict_on_unique(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// Foreign keys are always enforced. In-memory databases live only as long
/// as their connection, so they get a single connection that is never
/// recycled.
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<SqlitePool, sqlx::Error> {
    let url = database_url.expose_secret();
    let in_memory = url.contains(":memory:") || url.contains("mode=memory");

    let mut options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    if !in_memory {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    let pool_options = SqlitePoolOptions::new().acquire_timeout(Duration::from_secs(10));
    let pool_options = if in_memory {
        pool_options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        pool_options.max_connections(10).min_connections(2)
    };

    pool_options.connect_with(options).await
}

/// Apply the embedded schema migrations.
///
/// # Errors
///
/// Returns `sqlx::migrate::MigrateError` if a migration fails or the applied
/// history does not match the embedded migrations.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

#[cfg(test)]
pub(crate) mod testing {
    //! Shared fixtures for repository and service tests.

    use secrecy::SecretString;
    use sqlx::SqlitePool;

    use pedidos_core::{Email, Role, UserId};

    use super::UserRepository;

    /// Fresh in-memory database with the schema applied.
    pub async fn pool() -> SqlitePool {
        let pool = super::create_pool(&SecretString::from("sqlite::memory:"))
            .await
            .expect("in-memory pool");
        super::run_migrations(&pool).await.expect("migrations");
        pool
    }

    /// Insert a user with a throwaway password hash.
    pub async fn user(pool: &SqlitePool, name: &str, email: &str, role: Role) -> UserId {
        let email = Email::parse(email).expect("valid email");
        UserRepository::new(pool)
            .create(name, &email, "not-a-real-hash", role)
            .await
            .expect("create user")
            .id
    }

    /// Number of stored orders.
    pub async fn order_count(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(pool)
            .await
            .expect("count orders")
    }
}
