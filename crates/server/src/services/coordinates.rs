//! Coordinate normalization.
//!
//! Downstream mapping and tracking never handle missing locations: any order
//! with a NULL latitude or longitude gets the configured fallback point
//! written to both columns. The pass is idempotent because the selection
//! and the update both skip orders that already have both values.

use serde::Serialize;
use tracing::instrument;

use print_router_core::{Coordinates, OrderId};

use super::{EngineError, ItemFailure};
use crate::db::FulfillmentStore;

/// Outcome of one normalization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizationReport {
    /// Orders selected because a coordinate was missing.
    pub scanned: usize,
    /// Orders whose coordinates were written.
    pub updated: usize,
    /// Orders that gained coordinates between selection and update.
    pub skipped: usize,
    /// Orders whose update failed; re-running retries them.
    pub failures: Vec<ItemFailure<OrderId>>,
}

/// Writes fallback coordinates to orders that lack them.
pub struct CoordinateNormalizer<'a> {
    store: &'a dyn FulfillmentStore,
    fallback: Coordinates,
}

impl<'a> CoordinateNormalizer<'a> {
    #[must_use]
    pub fn new(store: &'a dyn FulfillmentStore, fallback: Coordinates) -> Self {
        Self { store, fallback }
    }

    /// Run one pass over every order missing a coordinate.
    ///
    /// Each order is its own unit of work: a failed update is recorded and
    /// the pass continues.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Store` only if the orders cannot be listed.
    #[instrument(skip(self), fields(fallback = %self.fallback))]
    pub async fn run(&self) -> Result<NormalizationReport, EngineError> {
        let orders = self.store.orders_missing_coordinates().await?;
        let mut report = NormalizationReport {
            scanned: orders.len(),
            ..NormalizationReport::default()
        };

        for order in orders {
            match self.ensure(order.id).await {
                Ok(true) => report.updated += 1,
                Ok(false) => report.skipped += 1,
                Err(e) => {
                    tracing::warn!(order_id = %order.id, error = %e, "Failed to normalize coordinates");
                    report.failures.push(ItemFailure::new(order.id, &e));
                }
            }
        }

        tracing::info!(
            scanned = report.scanned,
            updated = report.updated,
            skipped = report.skipped,
            failed = report.failures.len(),
            "Coordinate normalization completed"
        );
        Ok(report)
    }

    /// Give a single order coordinates if it has none.
    ///
    /// Returns `true` if the order was updated.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Store` if the update fails.
    pub async fn ensure(&self, order_id: OrderId) -> Result<bool, EngineError> {
        Ok(self
            .store
            .set_order_coordinates(order_id, self.fallback)
            .await?)
    }
}
