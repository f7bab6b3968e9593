//! Fulfillment lifecycle transitions.
//!
//! A transition is accepted only when:
//! 1. the actor is staff of the assignment's current print center,
//! 2. the requested status is adjacent to the stored one, and
//! 3. the stored status is unchanged when the update lands.
//!
//! The last check is a compare-and-swap in the store, so two staff members
//! racing on the same assignment cannot both succeed.

use serde::Deserialize;
use tracing::instrument;

use print_router_core::{AssignmentId, AssignmentStatus, StaffUserId};

use super::EngineError;
use crate::db::FulfillmentStore;
use crate::models::Assignment;

/// A requested status change.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TransitionRequest {
    /// Status to move to.
    pub status: AssignmentStatus,
    /// Status the caller last saw. Defaults to the status read at validation.
    #[serde(default)]
    pub expected: Option<AssignmentStatus>,
}

impl TransitionRequest {
    #[must_use]
    pub const fn to(status: AssignmentStatus) -> Self {
        Self {
            status,
            expected: None,
        }
    }
}

/// Applies staff-driven status changes.
pub struct LifecycleService<'a> {
    store: &'a dyn FulfillmentStore,
}

impl<'a> LifecycleService<'a> {
    #[must_use]
    pub fn new(store: &'a dyn FulfillmentStore) -> Self {
        Self { store }
    }

    /// Move an assignment to a new status.
    ///
    /// # Errors
    ///
    /// - `EngineError::NotFound` if the assignment does not exist
    /// - `EngineError::Forbidden` if `actor` is not staff of its center
    /// - `EngineError::InvalidTransition` if the move is not adjacent
    /// - `EngineError::StaleStatus` if the status changed concurrently
    #[instrument(skip(self))]
    pub async fn transition(
        &self,
        actor: StaffUserId,
        assignment_id: AssignmentId,
        request: TransitionRequest,
    ) -> Result<Assignment, EngineError> {
        let assignment = self.load(assignment_id).await?;
        self.authorize(actor, &assignment).await?;

        let current = assignment.status;
        if let Some(expected) = request.expected
            && expected != current
        {
            return Err(EngineError::StaleStatus {
                id: assignment_id,
                expected,
                actual: current,
            });
        }

        let next = current.transition(request.status)?;

        let Some(updated) = self
            .store
            .compare_and_set_status(assignment_id, current, next)
            .await?
        else {
            let actual = self.load(assignment_id).await?.status;
            tracing::info!(
                assignment_id = %assignment_id,
                expected = %current,
                actual = %actual,
                "Transition lost a race"
            );
            return Err(EngineError::StaleStatus {
                id: assignment_id,
                expected: current,
                actual,
            });
        };

        tracing::info!(
            assignment_id = %assignment_id,
            from = %current,
            to = %next,
            actor = %actor,
            "Assignment status changed"
        );
        Ok(updated)
    }

    async fn load(&self, id: AssignmentId) -> Result<Assignment, EngineError> {
        self.store
            .assignment(id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("assignment {id}")))
    }

    async fn authorize(&self, actor: StaffUserId, assignment: &Assignment) -> Result<(), EngineError> {
        match self.store.staff_print_center(actor).await? {
            Some(center) if center == assignment.print_center_id => Ok(()),
            _ => Err(EngineError::Forbidden(format!(
                "user {actor} is not staff of print center {}",
                assignment.print_center_id
            ))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use AssignmentStatus::{Cancelled, Delivered, Pending, Printing, Ready};
    use print_router_core::PrintCenterId;

    use super::*;
    use crate::db::MemoryStore;
    use crate::db::memory::tests::paid_order;

    const STAFF: StaffUserId = StaffUserId::new(7);

    /// Store with one assignment at a center `STAFF` belongs to.
    async fn setup() -> (MemoryStore, Assignment) {
        let store = MemoryStore::new();
        let center = store.insert_print_center("Maadi", true).unwrap();
        store.add_staff(STAFF, center.id).unwrap();
        let order = store.insert_order(paid_order(Some(1.0), Some(1.0))).unwrap();
        let assignment = store.insert_assignment(order.id, center.id).await.unwrap();
        (store, assignment)
    }

    #[tokio::test]
    async fn test_full_happy_path() {
        let (store, assignment) = setup().await;
        let service = LifecycleService::new(&store);

        for status in [Printing, Ready, Delivered] {
            let updated = service
                .transition(STAFF, assignment.id, TransitionRequest::to(status))
                .await
                .unwrap();
            assert_eq!(updated.status, status);
        }
    }

    #[tokio::test]
    async fn test_skip_rejected_and_state_unchanged() {
        let (store, assignment) = setup().await;
        let service = LifecycleService::new(&store);

        let err = service
            .transition(STAFF, assignment.id, TransitionRequest::to(Delivered))
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::InvalidTransition(t) if t.from == Pending));
        let stored = store.assignment(assignment.id).await.unwrap().unwrap();
        assert_eq!(stored.status, Pending);
        assert_eq!(stored.updated_at, assignment.updated_at);
    }

    #[tokio::test]
    async fn test_terminal_states_are_final() {
        let (store, assignment) = setup().await;
        let service = LifecycleService::new(&store);
        service
            .transition(STAFF, assignment.id, TransitionRequest::to(Cancelled))
            .await
            .unwrap();

        for status in AssignmentStatus::ALL {
            let result = service
                .transition(STAFF, assignment.id, TransitionRequest::to(status))
                .await;
            assert!(matches!(result, Err(EngineError::InvalidTransition(_))));
        }
    }

    #[tokio::test]
    async fn test_staff_of_other_center_forbidden() {
        let (store, assignment) = setup().await;
        let other = store.insert_print_center("Giza", true).unwrap();
        let outsider = StaffUserId::new(8);
        store.add_staff(outsider, other.id).unwrap();

        let err = LifecycleService::new(&store)
            .transition(outsider, assignment.id, TransitionRequest::to(Printing))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_user_without_membership_forbidden() {
        let (store, assignment) = setup().await;
        let err = LifecycleService::new(&store)
            .transition(StaffUserId::new(99), assignment.id, TransitionRequest::to(Printing))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_stale_expected_status_rejected() {
        let (store, assignment) = setup().await;
        let service = LifecycleService::new(&store);
        service
            .transition(STAFF, assignment.id, TransitionRequest::to(Printing))
            .await
            .unwrap();

        // A second client still believes the assignment is PENDING.
        let err = service
            .transition(
                STAFF,
                assignment.id,
                TransitionRequest {
                    status: Cancelled,
                    expected: Some(Pending),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            EngineError::StaleStatus { expected: Pending, actual: Printing, .. }
        ));
        let stored = store.assignment(assignment.id).await.unwrap().unwrap();
        assert_eq!(stored.status, Printing);
    }

    #[tokio::test]
    async fn test_authorization_follows_reassignment() {
        let (store, assignment) = setup().await;
        let moved_to: PrintCenterId = store.insert_print_center("Nasr City", true).unwrap().id;
        store.reassign_all(moved_to).await.unwrap();

        let err = LifecycleService::new(&store)
            .transition(STAFF, assignment.id, TransitionRequest::to(Printing))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_unknown_assignment() {
        let (store, _) = setup().await;
        let err = LifecycleService::new(&store)
            .transition(STAFF, AssignmentId::new(12345), TransitionRequest::to(Printing))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }
}
