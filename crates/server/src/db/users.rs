//! User repository for database operations.
//!
//! The credential store: account lookup by email, password hashes, and
//! account creation.

use sqlx::SqlitePool;

use pedidos_core::{Email, Role, UserId};

use super::{RepositoryError, conflict_on_unique};
use crate::models::User;

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for user queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: UserId,
    name: String,
    email: String,
    role: String,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let role = row
            .role
            .parse::<Role>()
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

        Ok(Self {
            id: row.id,
            name: row.name,
            email,
            role,
        })
    }
}

/// Internal row type for credential lookups.
#[derive(Debug, sqlx::FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a user and their password hash by email.
    ///
    /// Returns `None` if no account uses the email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r"
            SELECT id, name, email, role, password_hash
            FROM users
            WHERE email = ?
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let user = row.user.try_into()?;
        Ok(Some((user, row.password_hash)))
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        name: &str,
        email: &Email,
        password_hash: &str,
        role: Role,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO users (name, email, password_hash, role)
            VALUES (?, ?, ?, ?)
            RETURNING id, name, email, role
            ",
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "email"))?;

        row.try_into()
    }

    /// Create a user unless the email is already taken.
    ///
    /// Returns `true` if a row was inserted. Safe to race: the unique email
    /// constraint decides the winner and the loser inserts nothing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create_if_absent(
        &self,
        name: &str,
        email: &Email,
        password_hash: &str,
        role: Role,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO users (name, email, password_hash, role)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (email) DO NOTHING
            ",
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count users with the given role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_by_role(&self, role: Role) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role = ?")
            .bind(role)
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::testing;

    #[tokio::test]
    async fn test_create_and_fetch_by_email() {
        let pool = testing::pool().await;
        let users = UserRepository::new(&pool);
        let email = Email::parse("maria@example.com").unwrap();

        let created = users
            .create("Maria", &email, "hash", Role::User)
            .await
            .unwrap();
        let (fetched, hash) = users.get_credentials(&email).await.unwrap().unwrap();

        assert_eq!(created, fetched);
        assert_eq!(fetched.role, Role::User);
        assert_eq!(hash, "hash");
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let pool = testing::pool().await;
        let users = UserRepository::new(&pool);
        let email = Email::parse("maria@example.com").unwrap();

        users
            .create("Maria", &email, "hash", Role::User)
            .await
            .unwrap();
        let err = users
            .create("Other Maria", &email, "hash", Role::Admin)
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_if_absent_inserts_once() {
        let pool = testing::pool().await;
        let users = UserRepository::new(&pool);
        let email = Email::parse("admin@sys.com").unwrap();

        assert!(
            users
                .create_if_absent("Admin", &email, "hash", Role::Admin)
                .await
                .unwrap()
        );
        assert!(
            !users
                .create_if_absent("Admin", &email, "other", Role::Admin)
                .await
                .unwrap()
        );
        assert_eq!(users.count_by_role(Role::Admin).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_credentials_returns_hash() {
        let pool = testing::pool().await;
        let users = UserRepository::new(&pool);
        let email = Email::parse("maria@example.com").unwrap();
        users
            .create("Maria", &email, "$argon2id$stored", Role::User)
            .await
            .unwrap();

        let (user, hash) = users.get_credentials(&email).await.unwrap().unwrap();
        assert_eq!(user.name, "Maria");
        assert_eq!(hash, "$argon2id$stored");

        let unknown = Email::parse("nobody@example.com").unwrap();
        assert!(users.get_credentials(&unknown).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_role_is_reported() {
        let pool = testing::pool().await;
        sqlx::query("PRAGMA ignore_check_constraints = ON")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO users (name, email, password_hash, role) VALUES ('X', 'x@example.com', 'h', 'root')",
        )
        .execute(&pool)
        .await
        .unwrap();

        let email = Email::parse("x@example.com").unwrap();
        let err = UserRepository::new(&pool)
            .get_credentials(&email)
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::DataCorruption(_)));
    }
}
