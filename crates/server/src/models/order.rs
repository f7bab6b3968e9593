//! Paid customer orders as read from the order system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use print_router_core::{CustomerId, Money, OrderId, OrderStatus};

/// A customer order (domain type).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Customer who placed the order.
    pub customer_id: CustomerId,
    /// Payment status.
    pub status: OrderStatus,
    /// Order total.
    pub total: Money,
    /// Delivery address (free text).
    pub address: String,
    /// Latitude in decimal degrees, `None` until normalized.
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees, `None` until normalized.
    pub longitude: Option<f64>,
    /// When the order was created.
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Returns true if either coordinate is missing.
    #[must_use]
    pub const fn needs_coordinates(&self) -> bool {
        self.latitude.is_none() || self.longitude.is_none()
    }
}

/// Input for recording an order (used by seeding and the in-memory store).
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    pub customer_id: CustomerId,
    pub status: OrderStatus,
    pub total: Money,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}
