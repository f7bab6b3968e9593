//! Public order tracking.
//!
//! This is the only read path reachable without authentication. The
//! returned [`TrackingView`] carries the assignment status and the center
//! name, nothing else.

use tracing::instrument;

use print_router_core::OrderId;

use super::EngineError;
use crate::db::FulfillmentStore;
use crate::models::{TrackingCenter, TrackingView};

/// Read-only tracking lookups.
pub struct TrackingGateway<'a> {
    store: &'a dyn FulfillmentStore,
}

impl<'a> TrackingGateway<'a> {
    #[must_use]
    pub fn new(store: &'a dyn FulfillmentStore) -> Self {
        Self { store }
    }

    /// Look up the fulfillment state of an order.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::NotFound` if the order has no assignment.
    #[instrument(skip(self))]
    pub async fn track(&self, order_id: OrderId) -> Result<TrackingView, EngineError> {
        let assignment = self
            .store
            .assignment_for_order(order_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("tracking for order {order_id}")))?;

        let center = self
            .store
            .print_center(assignment.print_center_id)
            .await?
            .ok_or_else(|| {
                tracing::error!(
                    assignment_id = %assignment.id,
                    print_center_id = %assignment.print_center_id,
                    "Assignment references a missing print center"
                );
                EngineError::NotFound(format!("tracking for order {order_id}"))
            })?;

        Ok(TrackingView {
            status: assignment.status,
            print_center: TrackingCenter { name: center.name },
        })
    }
}
