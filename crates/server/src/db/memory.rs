//! In-memory [`FulfillmentStore`] for tests and local runs.
//!
//! Mirrors the `PostgreSQL` rules the engine depends on: one assignment per
//! order, compare-and-swap status updates, and conditional coordinate
//! writes. Failures can be injected per order or store-wide.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use print_router_core::{
    AssignmentId, AssignmentStatus, Coordinates, OrderId, PrintCenterId, StaffUserId,
};

use super::{FulfillmentStore, RepositoryError};
use crate::models::{Assignment, NewOrder, Order, PrintCenter};

#[derive(Debug, Default)]
struct Tables {
    orders: BTreeMap<OrderId, Order>,
    centers: BTreeMap<PrintCenterId, PrintCenter>,
    assignments: BTreeMap<AssignmentId, Assignment>,
    staff: BTreeMap<StaffUserId, PrintCenterId>,
    next_id: i32,
    failing_orders: HashSet<OrderId>,
    unavailable: bool,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn check_available(&self) -> Result<(), RepositoryError> {
        if self.unavailable {
            return Err(RepositoryError::Unavailable("store offline".to_string()));
        }
        Ok(())
    }

    fn check_order_writable(&self, order_id: OrderId) -> Result<(), RepositoryError> {
        self.check_available()?;
        if self.failing_orders.contains(&order_id) {
            return Err(RepositoryError::Unavailable(format!(
                "injected failure for order {order_id}"
            )));
        }
        Ok(())
    }

    fn sorted_orders<F>(&self, predicate: F) -> Vec<Order>
    where
        F: Fn(&Order) -> bool,
    {
        let mut orders: Vec<Order> = self
            .orders
            .values()
            .filter(|o| predicate(o))
            .cloned()
            .collect();
        orders.sort_by_key(|o| (o.created_at, o.id));
        orders
    }
}

/// Store holding all rows in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, RepositoryError> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store lock poisoned".to_string()))
    }

    /// Record an order as the order system would.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the store lock is poisoned.
    pub fn insert_order(&self, input: NewOrder) -> Result<Order, RepositoryError> {
        let mut tables = self.lock()?;
        let id = OrderId::new(tables.next_id());
        let order = Order {
            id,
            customer_id: input.customer_id,
            status: input.status,
            total: input.total,
            address: input.address,
            latitude: input.latitude,
            longitude: input.longitude,
            created_at: Utc::now(),
        };
        tables.orders.insert(id, order.clone());
        Ok(order)
    }

    /// Read an order back.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the store lock is poisoned.
    pub fn order(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        Ok(self.lock()?.orders.get(&id).cloned())
    }

    /// Register a print center.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the store lock is poisoned.
    pub fn insert_print_center(
        &self,
        name: &str,
        is_active: bool,
    ) -> Result<PrintCenter, RepositoryError> {
        let mut tables = self.lock()?;
        let id = PrintCenterId::new(tables.next_id());
        let center = PrintCenter {
            id,
            name: name.to_string(),
            is_active,
            created_at: Utc::now(),
        };
        tables.centers.insert(id, center.clone());
        Ok(center)
    }

    /// Flip a center's active flag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the center does not exist.
    pub fn set_center_active(
        &self,
        id: PrintCenterId,
        is_active: bool,
    ) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        let center = tables
            .centers
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound)?;
        center.is_active = is_active;
        Ok(())
    }

    /// Make a user staff of a center, replacing any previous membership.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the center does not exist.
    pub fn add_staff(
        &self,
        user_id: StaffUserId,
        print_center_id: PrintCenterId,
    ) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        if !tables.centers.contains_key(&print_center_id) {
            return Err(RepositoryError::NotFound);
        }
        tables.staff.insert(user_id, print_center_id);
        Ok(())
    }

    /// Every assignment, by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the store lock is poisoned.
    pub fn all_assignments(&self) -> Result<Vec<Assignment>, RepositoryError> {
        Ok(self.lock()?.assignments.values().cloned().collect())
    }

    /// Make every write touching `order_id` fail.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the store lock is poisoned.
    pub fn fail_writes_for(&self, order_id: OrderId) -> Result<(), RepositoryError> {
        self.lock()?.failing_orders.insert(order_id);
        Ok(())
    }

    /// Take the whole store offline (or bring it back).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the store lock is poisoned.
    pub fn set_unavailable(&self, unavailable: bool) -> Result<(), RepositoryError> {
        self.lock()?.unavailable = unavailable;
        Ok(())
    }
}

#[async_trait]
impl FulfillmentStore for MemoryStore {
    async fn orders_missing_coordinates(&self) -> Result<Vec<Order>, RepositoryError> {
        let tables = self.lock()?;
        tables.check_available()?;
        Ok(tables.sorted_orders(Order::needs_coordinates))
    }

    async fn set_order_coordinates(
        &self,
        order_id: OrderId,
        coordinates: Coordinates,
    ) -> Result<bool, RepositoryError> {
        let mut tables = self.lock()?;
        tables.check_order_writable(order_id)?;
        let order = tables
            .orders
            .get_mut(&order_id)
            .ok_or(RepositoryError::NotFound)?;
        if !order.needs_coordinates() {
            return Ok(false);
        }
        order.latitude = Some(coordinates.latitude());
        order.longitude = Some(coordinates.longitude());
        Ok(true)
    }

    async fn eligible_orders(&self) -> Result<Vec<Order>, RepositoryError> {
        let tables = self.lock()?;
        tables.check_available()?;
        let assigned: HashSet<OrderId> = tables.assignments.values().map(|a| a.order_id).collect();
        Ok(tables.sorted_orders(|o| {
            o.status == print_router_core::OrderStatus::Paid && !assigned.contains(&o.id)
        }))
    }

    async fn active_print_centers(&self) -> Result<Vec<PrintCenter>, RepositoryError> {
        let tables = self.lock()?;
        tables.check_available()?;
        Ok(tables
            .centers
            .values()
            .filter(|c| c.is_active)
            .cloned()
            .collect())
    }

    async fn print_center(
        &self,
        id: PrintCenterId,
    ) -> Result<Option<PrintCenter>, RepositoryError> {
        let tables = self.lock()?;
        tables.check_available()?;
        Ok(tables.centers.get(&id).cloned())
    }

    async fn insert_assignment(
        &self,
        order_id: OrderId,
        print_center_id: PrintCenterId,
    ) -> Result<Assignment, RepositoryError> {
        let mut tables = self.lock()?;
        tables.check_order_writable(order_id)?;
        if !tables.orders.contains_key(&order_id) || !tables.centers.contains_key(&print_center_id)
        {
            return Err(RepositoryError::NotFound);
        }
        if tables.assignments.values().any(|a| a.order_id == order_id) {
            return Err(RepositoryError::DuplicateAssignment);
        }

        let now = Utc::now();
        let assignment = Assignment {
            id: AssignmentId::new(tables.next_id()),
            order_id,
            print_center_id,
            status: AssignmentStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        tables.assignments.insert(assignment.id, assignment.clone());
        Ok(assignment)
    }

    async fn assignment(&self, id: AssignmentId) -> Result<Option<Assignment>, RepositoryError> {
        let tables = self.lock()?;
        tables.check_available()?;
        Ok(tables.assignments.get(&id).cloned())
    }

    async fn assignment_for_order(
        &self,
        order_id: OrderId,
    ) -> Result<Option<Assignment>, RepositoryError> {
        let tables = self.lock()?;
        tables.check_available()?;
        Ok(tables
            .assignments
            .values()
            .find(|a| a.order_id == order_id)
            .cloned())
    }

    async fn compare_and_set_status(
        &self,
        id: AssignmentId,
        expected: AssignmentStatus,
        next: AssignmentStatus,
    ) -> Result<Option<Assignment>, RepositoryError> {
        let mut tables = self.lock()?;
        tables.check_available()?;
        let Some(assignment) = tables.assignments.get_mut(&id) else {
            return Ok(None);
        };
        if assignment.status != expected {
            return Ok(None);
        }
        assignment.status = next;
        assignment.updated_at = Utc::now();
        Ok(Some(assignment.clone()))
    }

    async fn reassign_all(&self, print_center_id: PrintCenterId) -> Result<u64, RepositoryError> {
        let mut tables = self.lock()?;
        tables.check_available()?;
        let now = Utc::now();
        let mut updated = 0;
        for assignment in tables.assignments.values_mut() {
            if assignment.print_center_id != print_center_id {
                assignment.print_center_id = print_center_id;
                assignment.updated_at = now;
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn staff_print_center(
        &self,
        user_id: StaffUserId,
    ) -> Result<Option<PrintCenterId>, RepositoryError> {
        let tables = self.lock()?;
        tables.check_available()?;
        Ok(tables.staff.get(&user_id).copied())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.lock()?.check_available()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use rust_decimal::Decimal;

    use print_router_core::{CurrencyCode, CustomerId, Money, OrderStatus};

    use super::*;

    /// A PAID order at `coordinates`.
    pub(crate) fn paid_order(latitude: Option<f64>, longitude: Option<f64>) -> NewOrder {
        NewOrder {
            customer_id: CustomerId::new(100),
            status: OrderStatus::Paid,
            total: Money::new(Decimal::new(25000, 2), CurrencyCode::EGP).unwrap(),
            address: "12 Talaat Harb St, Cairo".to_string(),
            latitude,
            longitude,
        }
    }

    #[tokio::test]
    async fn test_duplicate_assignment_rejected() {
        let store = MemoryStore::new();
        let center = store.insert_print_center("Downtown", true).unwrap();
        let order = store.insert_order(paid_order(Some(1.0), Some(2.0))).unwrap();

        store.insert_assignment(order.id, center.id).await.unwrap();
        let err = store.insert_assignment(order.id, center.id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::DuplicateAssignment));
        assert_eq!(store.all_assignments().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_compare_and_set_rejects_stale_expected() {
        let store = MemoryStore::new();
        let center = store.insert_print_center("Downtown", true).unwrap();
        let order = store.insert_order(paid_order(Some(1.0), Some(2.0))).unwrap();
        let assignment = store.insert_assignment(order.id, center.id).await.unwrap();

        let stale = store
            .compare_and_set_status(
                assignment.id,
                AssignmentStatus::Printing,
                AssignmentStatus::Ready,
            )
            .await
            .unwrap();
        assert!(stale.is_none());

        let updated = store
            .compare_and_set_status(
                assignment.id,
                AssignmentStatus::Pending,
                AssignmentStatus::Printing,
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, AssignmentStatus::Printing);
        assert!(updated.updated_at >= assignment.updated_at);
    }

    #[tokio::test]
    async fn test_eligible_orders_excludes_unpaid_and_assigned() {
        let store = MemoryStore::new();
        let center = store.insert_print_center("Downtown", true).unwrap();
        let assigned = store.insert_order(paid_order(Some(1.0), Some(2.0))).unwrap();
        store.insert_assignment(assigned.id, center.id).await.unwrap();
        let mut unpaid = paid_order(None, None);
        unpaid.status = OrderStatus::Created;
        store.insert_order(unpaid).unwrap();
        let open = store.insert_order(paid_order(None, None)).unwrap();

        let eligible = store.eligible_orders().await.unwrap();
        assert_eq!(eligible.iter().map(|o| o.id).collect::<Vec<_>>(), vec![open.id]);
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_fast() {
        let store = MemoryStore::new();
        store.set_unavailable(true).unwrap();
        assert!(matches!(
            store.ping().await,
            Err(RepositoryError::Unavailable(_))
        ));
    }
}
