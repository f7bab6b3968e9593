//! Command implementations.

pub mod inspect;
pub mod jobs;
pub mod migrate;

use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;

use print_router_server::config::{ConfigError, ServerConfig};
use print_router_server::db;
use print_router_server::services::EngineError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Load configuration and open a pool.
///
/// Callers close the pool when they are done.
async fn connect() -> Result<(ServerConfig, PgPool), CliError> {
    let config = ServerConfig::from_env()?;
    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;
    Ok((config, pool))
}

/// Print a report to stdout as pretty JSON.
fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let out = serde_json::to_string_pretty(value)?;
    #[allow(clippy::print_stdout)]
    {
        println!("{out}");
    }
    Ok(())
}
