//! Authentication service.
//!
//! Password login against the credential store, the idempotent admin
//! bootstrap, and account creation for operators.

mod error;

pub use error::AuthError;

use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::SqlitePool;
use tracing::{info, warn};

use pedidos_core::{Email, Role};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::User;

/// Email of the account created by [`AuthService::bootstrap_admin`].
pub const BOOTSTRAP_ADMIN_EMAIL: &str = "admin@sys.com";

/// Display name of the bootstrapped admin.
pub const BOOTSTRAP_ADMIN_NAME: &str = "Admin";

/// Hash checked against when the email is unknown, so both login failure
/// paths do the same argon2 work.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("pedidos-timing-equalizer").ok());

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Check an email and password against the credential store.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown or malformed
    /// email and for a wrong password alike.
    /// Returns `AuthError::Repository` if the lookup fails.
    pub async fn verify_login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let Ok(email) = Email::parse(email) else {
            burn_dummy_verify(password);
            return Err(AuthError::InvalidCredentials);
        };

        let Some((user, password_hash)) = self.users.get_credentials(&email).await? else {
            burn_dummy_verify(password);
            return Err(AuthError::InvalidCredentials);
        };

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    /// Ensure the `admin@sys.com` administrator exists.
    ///
    /// Does nothing when the account is already present, whatever its
    /// current password. Returns `true` if the account was created.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if hashing fails.
    /// Returns `AuthError::Repository` if the insert fails.
    pub async fn bootstrap_admin(&self, password: &str) -> Result<bool, AuthError> {
        let email = Email::parse(BOOTSTRAP_ADMIN_EMAIL)?;
        let password_hash = hash_password(password)?;

        let created = self
            .users
            .create_if_absent(BOOTSTRAP_ADMIN_NAME, &email, &password_hash, Role::Admin)
            .await?;

        if created {
            info!(email = BOOTSTRAP_ADMIN_EMAIL, "Bootstrapped admin account");
        }

        Ok(created)
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if the name or password is empty.
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<User, AuthError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::Validation("name is required".to_string()));
        }
        if password.is_empty() {
            return Err(AuthError::Validation("password is required".to_string()));
        }

        let email = Email::parse(email)?;
        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(name, &email, &password_hash, role)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        info!(user_id = %user.id, role = %user.role, "Created user");
        Ok(user)
    }
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored PHC hash.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` if the password does not match
/// or the stored hash cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| {
        warn!("Stored password hash is not a valid PHC string");
        AuthError::InvalidCredentials
    })?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

fn burn_dummy_verify(password: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
}
