//! Session-related types for staff identity.
//!
//! Sessions are issued by the external identity service; the router only
//! reads them.

use serde::{Deserialize, Serialize};

use print_router_core::{StaffRole, StaffUserId};

/// Session-stored staff identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentStaff {
    /// Staff user ID (shared with the identity service).
    pub id: StaffUserId,
    /// Display name.
    pub name: String,
    /// Permission level.
    pub role: StaffRole,
}

/// Session keys for staff authentication data.
pub mod keys {
    /// Key for storing the current logged-in staff member.
    pub const CURRENT_STAFF: &str = "current_staff";
}
