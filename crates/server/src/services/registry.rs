//! Print center registry.
//!
//! Activation and deactivation happen outside the router; this module only
//! reads which centers may receive new work.

use print_router_core::PrintCenterId;

use super::EngineError;
use crate::db::FulfillmentStore;
use crate::models::PrintCenter;

/// Read access to fulfillment centers.
pub struct PrintCenterRegistry<'a> {
    store: &'a dyn FulfillmentStore,
}

impl<'a> PrintCenterRegistry<'a> {
    #[must_use]
    pub fn new(store: &'a dyn FulfillmentStore) -> Self {
        Self { store }
    }

    /// Active centers in a stable order (ascending ID).
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Store` if the lookup fails.
    pub async fn eligible_centers(&self) -> Result<Vec<PrintCenter>, EngineError> {
        Ok(self.store.active_print_centers().await?)
    }

    /// Look up a center, active or not.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::NotFound` if the center does not exist.
    pub async fn center(&self, id: PrintCenterId) -> Result<PrintCenter, EngineError> {
        self.store
            .print_center(id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("print center {id}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    #[tokio::test]
    async fn test_inactive_centers_excluded() {
        let store = MemoryStore::new();
        store.insert_print_center("Closed", false).unwrap();
        let open = store.insert_print_center("Heliopolis", true).unwrap();

        let registry = PrintCenterRegistry::new(&store);
        let eligible = registry.eligible_centers().await.unwrap();
        assert_eq!(eligible, vec![open]);
    }

    #[tokio::test]
    async fn test_no_active_centers() {
        let store = MemoryStore::new();
        store.insert_print_center("Closed", false).unwrap();

        let eligible = PrintCenterRegistry::new(&store)
            .eligible_centers()
            .await
            .unwrap();
        assert!(eligible.is_empty());
    }

    #[tokio::test]
    async fn test_center_lookup_includes_inactive() {
        let store = MemoryStore::new();
        let closed = store.insert_print_center("Closed", false).unwrap();
        let registry = PrintCenterRegistry::new(&store);

        assert_eq!(registry.center(closed.id).await.unwrap().name, "Closed");
        assert!(matches!(
            registry.center(PrintCenterId::new(999)).await,
            Err(EngineError::NotFound(_))
        ));
    }
}
