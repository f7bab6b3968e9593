//! Read-only commands.

use print_router_core::OrderId;
use print_router_server::db::PgStore;
use print_router_server::services::{PrintCenterRegistry, TrackingGateway};

use super::{CliError, connect, print_json};

/// List the centers that receive new assignments, in selection order.
pub async fn centers() -> Result<(), CliError> {
    let (_, pool) = connect().await?;
    let store = PgStore::new(pool.clone());

    let result = PrintCenterRegistry::new(&store).eligible_centers().await;
    pool.close().await;
    let centers = result?;

    if centers.is_empty() {
        tracing::warn!("No active print centers");
    }
    print_json(&centers)
}

/// Show the tracking view for one order.
pub async fn track(order: OrderId) -> Result<(), CliError> {
    let (_, pool) = connect().await?;
    let store = PgStore::new(pool.clone());

    let result = TrackingGateway::new(&store).track(order).await;
    pool.close().await;

    print_json(&result?)
}
