//! Status enums and the fulfillment lifecycle graph.
//!
//! ```text
//! PENDING ──► PRINTING ──► READY ──► DELIVERED
//!    │           │           │
//!    └───────────┴───────────┴──────► CANCELLED
//! ```
//!
//! `DELIVERED` and `CANCELLED` are terminal. Every other edge is rejected,
//! including backward moves and skips such as `PENDING -> DELIVERED`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Order payment status, as supplied by the external order system.
///
/// The router only ever reads orders at [`OrderStatus::Paid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "order_status", rename_all = "snake_case")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Created,
    Paid,
    Cancelled,
    Refunded,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "CREATED"),
            Self::Paid => write!(f, "PAID"),
            Self::Cancelled => write!(f, "CANCELLED"),
            Self::Refunded => write!(f, "REFUNDED"),
        }
    }
}

/// Fulfillment status of an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "assignment_status", rename_all = "snake_case")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentStatus {
    /// Created by the assignment engine, not yet picked up by the center.
    #[default]
    Pending,
    /// The center has started printing.
    Printing,
    /// Printed and waiting for hand-off.
    Ready,
    /// Handed to the customer. Terminal.
    Delivered,
    /// Abandoned. Terminal.
    Cancelled,
}

/// A requested status change that is not an edge of the lifecycle graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid transition from {from} to {to}")]
pub struct InvalidTransition {
    /// Status the assignment is currently in.
    pub from: AssignmentStatus,
    /// Status that was requested.
    pub to: AssignmentStatus,
}

impl AssignmentStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Printing,
        Self::Ready,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Returns true if no further transition is legal.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// The forward successor in the happy path, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Printing),
            Self::Printing => Some(Self::Ready),
            Self::Ready => Some(Self::Delivered),
            Self::Delivered | Self::Cancelled => None,
        }
    }

    /// Returns true if `to` is adjacent to `self` in the lifecycle graph.
    #[must_use]
    pub fn can_transition_to(self, to: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        to == Self::Cancelled || self.next() == Some(to)
    }

    /// Validate a transition and return the new status.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] if `to` is not adjacent to `self`.
    pub fn transition(self, to: Self) -> Result<Self, InvalidTransition> {
        if self.can_transition_to(to) {
            Ok(to)
        } else {
            Err(InvalidTransition { from: self, to })
        }
    }

    /// Statuses reachable from `self` in one step.
    #[must_use]
    pub fn allowed_transitions(self) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|to| self.can_transition_to(*to))
            .collect()
    }
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Printing => write!(f, "PRINTING"),
            Self::Ready => write!(f, "READY"),
            Self::Delivered => write!(f, "DELIVERED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

impl std::str::FromStr for AssignmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "PRINTING" => Ok(Self::Printing),
            "READY" => Ok(Self::Ready),
            "DELIVERED" => Ok(Self::Delivered),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(format!("invalid assignment status: {s}")),
        }
    }
}

/// Role carried by an authenticated staff identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    /// Runs batch assignment and repairs across all centers.
    Operator,
    /// Works at a single print center and advances its assignments.
    CenterStaff,
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Operator => write!(f, "operator"),
            Self::CenterStaff => write!(f, "center_staff"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use AssignmentStatus::{Cancelled, Delivered, Pending, Printing, Ready};

    #[test]
    fn test_happy_path_is_adjacent() {
        assert_eq!(Pending.transition(Printing), Ok(Printing));
        assert_eq!(Printing.transition(Ready), Ok(Ready));
        assert_eq!(Ready.transition(Delivered), Ok(Delivered));
    }

    #[test]
    fn test_skip_is_rejected() {
        let err = Pending.transition(Delivered).unwrap_err();
        assert_eq!(err.from, Pending);
        assert_eq!(err.to, Delivered);
        assert_eq!(err.to_string(), "invalid transition from PENDING to DELIVERED");
    }

    #[test]
    fn test_backward_is_rejected() {
        assert!(!Ready.can_transition_to(Printing));
        assert!(!Printing.can_transition_to(Pending));
    }

    #[test]
    fn test_self_transition_is_rejected() {
        for status in AssignmentStatus::ALL {
            assert!(!status.can_transition_to(status), "{status} -> {status}");
        }
    }

    #[test]
    fn test_cancel_from_every_open_state() {
        for from in [Pending, Printing, Ready] {
            assert_eq!(from.transition(Cancelled), Ok(Cancelled));
        }
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for from in [Delivered, Cancelled] {
            assert!(from.is_terminal());
            assert!(from.allowed_transitions().is_empty());
        }
    }

    #[test]
    fn test_allowed_transitions() {
        assert_eq!(Pending.allowed_transitions(), vec![Printing, Cancelled]);
        assert_eq!(Ready.allowed_transitions(), vec![Delivered, Cancelled]);
    }

    #[test]
    fn test_status_parse_and_display() {
        assert_eq!("printing".parse::<AssignmentStatus>(), Ok(Printing));
        assert_eq!("READY".parse::<AssignmentStatus>(), Ok(Ready));
        assert!("shipped".parse::<AssignmentStatus>().is_err());
        assert_eq!(Cancelled.to_string(), "CANCELLED");
    }

    #[test]
    fn test_status_serde_uses_screaming_case() {
        let json = serde_json::to_string(&Printing).unwrap();
        assert_eq!(json, "\"PRINTING\"");
        let back: OrderStatus = serde_json::from_str("\"PAID\"").unwrap();
        assert_eq!(back, OrderStatus::Paid);
    }
}
