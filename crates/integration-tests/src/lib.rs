//! Integration tests for the print router.
//!
//! # Running Tests
//!
//! ```bash
//! # Engine scenarios against the in-memory store
//! cargo test -p print-router-integration-tests
//!
//! # Also run the PostgreSQL and live-server tests
//! ROUTER_DATABASE_URL=postgres://... cargo test -p print-router-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `engine_scenarios` - assignment, reassignment, normalization, tracking
//! - `lifecycle` - the status state machine through the lifecycle service
//! - `postgres_store` - the same rules against a migrated database (ignored)
//! - `http_api` - a running server (ignored)

use rust_decimal::Decimal;
use secrecy::SecretString;

use print_router_core::{CurrencyCode, CustomerId, Money, OrderStatus};
use print_router_server::db::{MemoryStore, PgStore, RepositoryError};
use print_router_server::models::{NewOrder, PrintCenter};

/// A PAID order; `None` leaves the coordinate NULL.
///
/// # Panics
///
/// Never: the fixed total is non-negative.
#[must_use]
pub fn paid_order(latitude: Option<f64>, longitude: Option<f64>) -> NewOrder {
    NewOrder {
        customer_id: CustomerId::new(500),
        status: OrderStatus::Paid,
        total: Money::new(Decimal::new(18_000, 2), CurrencyCode::EGP)
            .unwrap_or_else(|e| panic!("fixture total rejected: {e}")),
        address: "5 Tahrir Square, Cairo".to_string(),
        latitude,
        longitude,
    }
}

/// An order in `status`.
#[must_use]
pub fn order_with_status(status: OrderStatus) -> NewOrder {
    NewOrder {
        status,
        ..paid_order(None, None)
    }
}

/// In-memory store with the named centers (all active) and `orders` paid
/// orders without coordinates.
///
/// # Errors
///
/// Returns `RepositoryError` if seeding fails.
pub fn seeded_store(
    centers: &[&str],
    orders: usize,
) -> Result<(MemoryStore, Vec<PrintCenter>), RepositoryError> {
    let store = MemoryStore::new();
    let centers = centers
        .iter()
        .map(|name| store.insert_print_center(name, true))
        .collect::<Result<Vec<_>, _>>()?;
    for _ in 0..orders {
        store.insert_order(paid_order(None, None))?;
    }
    Ok((store, centers))
}

/// Database URL for the ignored `PostgreSQL` tests.
#[must_use]
pub fn database_url() -> Option<SecretString> {
    std::env::var("ROUTER_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .map(SecretString::from)
}

/// Connect to the test database and apply migrations.
///
/// # Errors
///
/// Returns an error if the connection or a migration fails.
pub async fn migrated_store(
    database_url: &SecretString,
) -> Result<PgStore, Box<dyn std::error::Error>> {
    let pool = print_router_server::db::create_pool(database_url).await?;
    sqlx::migrate!("../server/migrations").run(&pool).await?;
    Ok(PgStore::new(pool))
}

/// Base URL for a running router (configurable via environment).
#[must_use]
pub fn router_base_url() -> String {
    std::env::var("ROUTER_BASE_URL").unwrap_or_else(|_| "http://localhost:3002".to_string())
}
