//! Database migration command.
//!
//! ```bash
//! pr-cli migrate
//! ```
//!
//! Applies `crates/server/migrations/` to `ROUTER_DATABASE_URL`. Already
//! applied migrations are skipped.

use super::{CliError, connect};

/// Run all pending migrations.
pub async fn run() -> Result<(), CliError> {
    let (_, pool) = connect().await?;

    tracing::info!("Running migrations...");
    let result = sqlx::migrate!("../server/migrations").run(&pool).await;
    pool.close().await;
    result?;

    tracing::info!("Migrations complete");
    Ok(())
}
