//! Database migration command.
//!
//! Applies the migrations embedded in `cartwheel_server::db::MIGRATOR`
//! (`crates/server/migrations/`). Already-applied migrations are skipped.

use cartwheel_server::db::MIGRATOR;

use super::{CommandError, connect};

/// Apply pending migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    let available = MIGRATOR.iter().count();
    tracing::info!(available, "Running migrations...");
    MIGRATOR.run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
