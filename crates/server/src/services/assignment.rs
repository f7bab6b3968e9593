//! Assignment engine.
//!
//! Every PAID order without an assignment is matched to the first eligible
//! print center. There is no load balancing: all orders in a run go to the
//! same center, and a deployment that needs smarter routing has to change
//! the selection in [`select_center`].
//!
//! An order is only assigned once it has a location: orders still missing
//! a coordinate go through [`CoordinateNormalizer::ensure`] first, and an
//! order whose normalization fails stays unassigned until the next run.
//! Centers are never modified.
//!
//! The engine does not lock. Two concurrent runs may both see the same order
//! as eligible; the store's uniqueness constraint lets exactly one insert
//! through and the other run counts the order as already handled.

use serde::Serialize;
use tracing::instrument;

use print_router_core::{Coordinates, OrderId, PrintCenterId};

use super::coordinates::CoordinateNormalizer;
use super::registry::PrintCenterRegistry;
use super::{EngineError, ItemFailure};
use crate::db::{FulfillmentStore, RepositoryError};
use crate::models::{Assignment, PrintCenter};

/// Outcome of one assignment run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AssignmentReport {
    /// Assignments created by this run.
    pub created: Vec<Assignment>,
    /// Orders another run assigned first.
    pub skipped: Vec<OrderId>,
    /// Orders that could not be assigned; re-running retries them.
    pub failures: Vec<ItemFailure<OrderId>>,
    /// True when the run did nothing because no center is active.
    pub no_eligible_centers: bool,
}

/// Outcome of a bulk reassignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReassignReport {
    pub print_center_id: PrintCenterId,
    /// Assignments whose center changed.
    pub updated: u64,
}

/// Pick the center for new assignments.
#[must_use]
pub fn select_center(eligible: &[PrintCenter]) -> Option<&PrintCenter> {
    eligible.first()
}

/// Creates and repairs assignments.
pub struct AssignmentEngine<'a> {
    store: &'a dyn FulfillmentStore,
    normalizer: CoordinateNormalizer<'a>,
}

impl<'a> AssignmentEngine<'a> {
    /// `fallback` is written to orders that reach assignment without a
    /// location.
    #[must_use]
    pub fn new(store: &'a dyn FulfillmentStore, fallback: Coordinates) -> Self {
        Self {
            store,
            normalizer: CoordinateNormalizer::new(store, fallback),
        }
    }

    /// Assign every eligible order to the first eligible center.
    ///
    /// With no active center the run is a reported no-op. Per-order store
    /// failures, including a failed coordinate write, are collected and the
    /// run continues.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Store` if centers or orders cannot be listed.
    #[instrument(skip(self))]
    pub async fn assign_unassigned_orders(&self) -> Result<AssignmentReport, EngineError> {
        let registry = PrintCenterRegistry::new(self.store);
        let centers = registry.eligible_centers().await?;
        let Some(center) = select_center(&centers) else {
            tracing::warn!("No active print centers; assignment run skipped");
            return Ok(AssignmentReport {
                no_eligible_centers: true,
                ..AssignmentReport::default()
            });
        };

        let orders = self.store.eligible_orders().await?;
        let mut report = AssignmentReport::default();

        for order in orders {
            if order.needs_coordinates()
                && let Err(e) = self.normalizer.ensure(order.id).await
            {
                tracing::warn!(
                    order_id = %order.id,
                    error = %e,
                    "Failed to normalize coordinates before assignment"
                );
                report.failures.push(ItemFailure::new(order.id, &e));
                continue;
            }

            match self.create(order.id, center.id).await {
                Ok(assignment) => {
                    tracing::debug!(
                        order_id = %order.id,
                        assignment_id = %assignment.id,
                        print_center_id = %center.id,
                        "Assignment created"
                    );
                    report.created.push(assignment);
                }
                Err(EngineError::DuplicateAssignment(order_id)) => {
                    tracing::debug!(order_id = %order_id, "Order already assigned; skipping");
                    report.skipped.push(order_id);
                }
                Err(e) => {
                    tracing::warn!(order_id = %order.id, error = %e, "Failed to create assignment");
                    report.failures.push(ItemFailure::new(order.id, &e));
                }
            }
        }

        tracing::info!(
            print_center_id = %center.id,
            created = report.created.len(),
            skipped = report.skipped.len(),
            failed = report.failures.len(),
            "Assignment run completed"
        );
        Ok(report)
    }

    /// Create one `PENDING` assignment.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::DuplicateAssignment` if the order is already
    /// assigned, `EngineError::NotFound` if the order or center is missing.
    pub async fn create(
        &self,
        order_id: OrderId,
        print_center_id: PrintCenterId,
    ) -> Result<Assignment, EngineError> {
        self.store
            .insert_assignment(order_id, print_center_id)
            .await
            .map_err(|e| match e {
                RepositoryError::DuplicateAssignment => EngineError::DuplicateAssignment(order_id),
                RepositoryError::NotFound => EngineError::NotFound(format!(
                    "order {order_id} or print center {print_center_id}"
                )),
                other => EngineError::Store(other),
            })
    }

    /// Point every assignment at `target`, whatever its status.
    ///
    /// Statuses are left alone. Assignments already at `target` are not
    /// counted, so an interrupted run can simply be repeated.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::NotFound` if `target` does not exist.
    #[instrument(skip(self))]
    pub async fn reassign_all(&self, target: PrintCenterId) -> Result<ReassignReport, EngineError> {
        let center = PrintCenterRegistry::new(self.store).center(target).await?;
        if !center.is_active {
            tracing::warn!(print_center_id = %target, "Reassigning to an inactive print center");
        }

        let updated = self.store.reassign_all(target).await?;
        tracing::warn!(
            print_center_id = %target,
            updated,
            "Bulk reassignment applied to all assignments, including terminal ones"
        );

        Ok(ReassignReport {
            print_center_id: target,
            updated,
        })
    }
}
