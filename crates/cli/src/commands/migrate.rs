//! Database migration command.
//!
//! Migrations are embedded from `crates/server/migrations/`. The server also
//! applies them on start; this command exists for deploy pipelines that
//! migrate before rolling out.

use super::CommandError;

/// Apply pending migrations.
pub async fn run() -> Result<(), CommandError> {
    let _ = super::connect().await?;
    tracing::info!("Migrations complete!");
    Ok(())
}
