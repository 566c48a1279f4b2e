//! User management commands.

use pedidos_core::{Role, UserId};
use pedidos_server::services::AuthService;

use super::CommandError;

/// Create a user with a password.
///
/// # Returns
///
/// The ID of the created user.
pub async fn create(
    email: &str,
    name: &str,
    role: &str,
    password: &str,
) -> Result<UserId, CommandError> {
    let role: Role = role
        .parse()
        .map_err(|_| CommandError::InvalidRole(role.to_owned()))?;

    let (_, pool) = super::connect().await?;

    tracing::info!("Creating user: {} ({})", email, role);
    let user = AuthService::new(&pool)
        .create_user(name, email, password, role)
        .await?;

    tracing::info!("User created with ID: {}", user.id);
    Ok(user.id)
}
