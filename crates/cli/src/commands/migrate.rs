//! Database migration command.
//!
//! Migrations live in `crates/api/migrations/` and are embedded at compile
//! time. The document store has no schema; see `shopsphere-cli indexes`.

use super::{CliError, connect_postgres};

/// Run all pending relational migrations.
///
/// # Errors
///
/// Returns an error if no database URL is set, the connection fails, or a
/// migration fails.
pub async fn run() -> Result<(), CliError> {
    let pool = connect_postgres().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
