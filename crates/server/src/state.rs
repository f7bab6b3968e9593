//! Application state shared across handlers.

use std::sync::Arc;

use print_router_core::Coordinates;

use crate::config::ServerConfig;
use crate::db::FulfillmentStore;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Handlers build the engine services from
/// [`AppState::store`] per request.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    store: Arc<dyn FulfillmentStore>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ServerConfig, store: Arc<dyn FulfillmentStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, store }),
        }
    }

    /// Get the fulfillment store.
    #[must_use]
    pub fn store(&self) -> &dyn FulfillmentStore {
        self.inner.store.as_ref()
    }

    /// Coordinates given to orders without a location.
    #[must_use]
    pub fn fallback_coordinates(&self) -> Coordinates {
        self.inner.config.fallback_coordinates
    }
}
