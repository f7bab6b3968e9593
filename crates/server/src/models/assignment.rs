//! Assignment records and their public projection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use print_router_core::{AssignmentId, AssignmentStatus, OrderId, PrintCenterId};

/// The link between one paid order and the center fulfilling it.
///
/// At most one assignment exists per order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Unique assignment ID.
    pub id: AssignmentId,
    /// Order being fulfilled (unique across assignments).
    pub order_id: OrderId,
    /// Center currently responsible; changed only by reassignment.
    pub print_center_id: PrintCenterId,
    /// Fulfillment status.
    pub status: AssignmentStatus,
    /// When the assignment was created.
    pub created_at: DateTime<Utc>,
    /// When the status or center last changed.
    pub updated_at: DateTime<Utc>,
}

/// Public tracking view of an assignment.
///
/// Served without authentication. Every field here is public: do not add
/// customer, payment or staff data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingView {
    pub status: AssignmentStatus,
    pub print_center: TrackingCenter,
}

/// The part of a print center shown on the tracking page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingCenter {
    pub name: String,
}
