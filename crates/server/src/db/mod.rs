//! Storage for the fulfillment router.
//!
//! # Tables
//!
//! - `print_center` - Fulfillment centers and their active flag
//! - `staff_member` - Which print center a staff user belongs to (at most one)
//! - `customer_order` - Orders written by the order system, read here
//! - `assignment` - One row per assigned order (`order_id` UNIQUE)
//! - `session` - Sessions shared with the identity service
//!
//! # Store handle
//!
//! Every engine operation receives a [`FulfillmentStore`] explicitly. The
//! at-most-one invariant rests on the store's uniqueness constraint, and
//! status changes are single-row compare-and-swap updates; the engine does
//! no locking of its own.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p print-router-cli -- migrate
//! ```

pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use print_router_core::{
    AssignmentId, AssignmentStatus, Coordinates, OrderId, PrintCenterId, StaffUserId,
};

use crate::models::{Assignment, Order, PrintCenter};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The store could not be reached in time.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// An assignment already exists for the order.
    #[error("assignment already exists for order")]
    DuplicateAssignment,
}

/// Storage capability used by the engine.
///
/// Implemented by [`PgStore`] for production and [`MemoryStore`] for tests
/// and local runs. Both enforce the same uniqueness and compare-and-swap
/// rules.
#[async_trait]
pub trait FulfillmentStore: Send + Sync {
    /// Orders with either coordinate missing, oldest first.
    async fn orders_missing_coordinates(&self) -> Result<Vec<Order>, RepositoryError>;

    /// Write both coordinates of an order if either is still missing.
    ///
    /// Returns `false` when the order already had both values.
    async fn set_order_coordinates(
        &self,
        order_id: OrderId,
        coordinates: Coordinates,
    ) -> Result<bool, RepositoryError>;

    /// PAID orders without an assignment, ordered by creation time then ID.
    async fn eligible_orders(&self) -> Result<Vec<Order>, RepositoryError>;

    /// Active print centers, ordered by ID.
    async fn active_print_centers(&self) -> Result<Vec<PrintCenter>, RepositoryError>;

    /// Look up a print center regardless of its active flag.
    async fn print_center(&self, id: PrintCenterId)
    -> Result<Option<PrintCenter>, RepositoryError>;

    /// Create a `PENDING` assignment.
    ///
    /// Fails with [`RepositoryError::DuplicateAssignment`] if the order is
    /// already assigned.
    async fn insert_assignment(
        &self,
        order_id: OrderId,
        print_center_id: PrintCenterId,
    ) -> Result<Assignment, RepositoryError>;

    async fn assignment(&self, id: AssignmentId) -> Result<Option<Assignment>, RepositoryError>;

    async fn assignment_for_order(
        &self,
        order_id: OrderId,
    ) -> Result<Option<Assignment>, RepositoryError>;

    /// Set the status only if the stored status equals `expected`.
    ///
    /// Returns `None` when the row is missing or its status has moved on.
    async fn compare_and_set_status(
        &self,
        id: AssignmentId,
        expected: AssignmentStatus,
        next: AssignmentStatus,
    ) -> Result<Option<Assignment>, RepositoryError>;

    /// Point every assignment at `print_center_id`. Returns rows changed.
    async fn reassign_all(&self, print_center_id: PrintCenterId) -> Result<u64, RepositoryError>;

    /// The print center a staff user belongs to, if any.
    async fn staff_print_center(
        &self,
        user_id: StaffUserId,
    ) -> Result<Option<PrintCenterId>, RepositoryError>;

    /// Cheap connectivity check.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// The short acquire timeout makes storage calls fail fast instead of
/// hanging when the database is unreachable.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url.expose_secret())
        .await
}
