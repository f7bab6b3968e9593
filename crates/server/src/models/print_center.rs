//! Print center domain type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use print_router_core::PrintCenterId;

/// A physical fulfillment center.
///
/// Only centers with `is_active = true` receive new assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintCenter {
    pub id: PrintCenterId,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
