//! Admin bootstrap command.

use secrecy::ExposeSecret;

use pedidos_server::services::AuthService;
use pedidos_server::services::auth::BOOTSTRAP_ADMIN_EMAIL;

use super::CommandError;

/// Ensure the bootstrap admin exists, using `PEDIDOS_ADMIN_PASSWORD`.
pub async fn run() -> Result<(), CommandError> {
    let (config, pool) = super::connect().await?;

    if config.admin_password_is_default {
        tracing::warn!("PEDIDOS_ADMIN_PASSWORD is not set; using the default password");
    }

    let created = AuthService::new(&pool)
        .bootstrap_admin(config.admin_password.expose_secret())
        .await?;

    if created {
        tracing::info!("Created admin account {BOOTSTRAP_ADMIN_EMAIL}");
    } else {
        tracing::info!("Admin account {BOOTSTRAP_ADMIN_EMAIL} already exists; nothing to do");
    }
    Ok(())
}
