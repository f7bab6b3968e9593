//! The fulfillment engine.
//!
//! Each service borrows a [`FulfillmentStore`](crate::db::FulfillmentStore)
//! for the duration of one operation:
//!
//! - [`coordinates`] - gives every order a usable location
//! - [`registry`] - answers which print centers may receive work
//! - [`assignment`] - matches paid orders to a center, bulk reassignment
//! - [`lifecycle`] - staff-driven status transitions
//! - [`tracking`] - the public, minimal read projection

pub mod assignment;
pub mod coordinates;
pub mod lifecycle;
pub mod registry;
pub mod tracking;

use serde::Serialize;
use thiserror::Error;

use print_router_core::{AssignmentId, AssignmentStatus, InvalidTransition, OrderId};

use crate::db::RepositoryError;

pub use assignment::{AssignmentEngine, AssignmentReport, ReassignReport};
pub use coordinates::{CoordinateNormalizer, NormalizationReport};
pub use lifecycle::{LifecycleService, TransitionRequest};
pub use registry::PrintCenterRegistry;
pub use tracking::TrackingGateway;

/// Errors surfaced by engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Referenced order, assignment or print center does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The order already has an assignment.
    #[error("order {0} is already assigned")]
    DuplicateAssignment(OrderId),

    /// The requested status is not adjacent to the current one.
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    /// The stored status changed after the request was validated.
    #[error("assignment {id} is {actual}, expected {expected}")]
    StaleStatus {
        id: AssignmentId,
        expected: AssignmentStatus,
        actual: AssignmentStatus,
    },

    /// The actor may not act on this assignment.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The store failed.
    #[error("store failure: {0}")]
    Store(#[from] RepositoryError),
}

/// One item of a batch that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure<I> {
    pub id: I,
    pub error: String,
}

impl<I> ItemFailure<I> {
    fn new(id: I, error: &impl std::fmt::Display) -> Self {
        Self {
            id,
            error: error.to_string(),
        }
    }
}
