//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong password, unknown email, or malformed email on login.
    ///
    /// Deliberately says nothing about which one.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Invalid email format when creating an account.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] pedidos_core::EmailError),

    /// An account with this email already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// A required account field is missing or empty.
    #[error("{0}")]
    Validation(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
