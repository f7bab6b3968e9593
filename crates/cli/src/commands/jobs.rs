//! Batch jobs: assignment runs, bulk reassignment, coordinate repair.
//!
//! Every job is safe to re-run. A job that hits per-order failures still
//! prints its report; the failed orders are listed and retried next run.

use print_router_core::PrintCenterId;
use print_router_server::db::PgStore;
use print_router_server::services::{AssignmentEngine, CoordinateNormalizer};

use super::{CliError, connect, print_json};

/// Assign every unassigned paid order.
pub async fn assign() -> Result<(), CliError> {
    let (config, pool) = connect().await?;
    let store = PgStore::new(pool.clone());

    let result = AssignmentEngine::new(&store, config.fallback_coordinates)
        .assign_unassigned_orders()
        .await;
    pool.close().await;
    let report = result?;

    if report.no_eligible_centers {
        tracing::warn!("No active print centers; nothing was assigned");
    }
    print_json(&report)
}

/// Move every assignment to `center`.
pub async fn reassign_all(center: PrintCenterId) -> Result<(), CliError> {
    let (config, pool) = connect().await?;
    let store = PgStore::new(pool.clone());

    let result = AssignmentEngine::new(&store, config.fallback_coordinates)
        .reassign_all(center)
        .await;
    pool.close().await;

    print_json(&result?)
}

/// Give orders without a location the fallback coordinates.
pub async fn normalize_coordinates() -> Result<(), CliError> {
    let (config, pool) = connect().await?;
    let store = PgStore::new(pool.clone());

    let result = CoordinateNormalizer::new(&store, config.fallback_coordinates)
        .run()
        .await;
    pool.close().await;

    print_json(&result?)
}
