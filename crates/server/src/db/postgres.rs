//! `PostgreSQL` implementation of [`FulfillmentStore`].
//!
//! Queries are checked at runtime (`query_as::<_, Row>`) so the crate builds
//! without a live database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use print_router_core::{
    AssignmentId, AssignmentStatus, Coordinates, CurrencyCode, CustomerId, Money, OrderId,
    OrderStatus, PrintCenterId, StaffUserId,
};

use super::{FulfillmentStore, RepositoryError};
use crate::models::{Assignment, Order, PrintCenter};

/// Name of the unique constraint on `assignment.order_id`.
const ASSIGNMENT_ORDER_UNIQUE: &str = "assignment_order_id_key";

/// `PostgreSQL` foreign key violation.
const FOREIGN_KEY_VIOLATION: &str = "23503";

const ORDER_COLUMNS: &str = "id, customer_id, status, total, currency_code, address, \
     latitude, longitude, created_at";

const ASSIGNMENT_COLUMNS: &str = "id, order_id, print_center_id, status, created_at, updated_at";

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    customer_id: i32,
    status: OrderStatus,
    total: Decimal,
    currency_code: String,
    address: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let currency: CurrencyCode = row.currency_code.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("order {}: {e}", row.id))
        })?;
        let total = Money::new(row.total, currency)
            .map_err(|e| RepositoryError::DataCorruption(format!("order {}: {e}", row.id)))?;

        Ok(Self {
            id: OrderId::new(row.id),
            customer_id: CustomerId::new(row.customer_id),
            status: row.status,
            total,
            address: row.address,
            latitude: row.latitude,
            longitude: row.longitude,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PrintCenterRow {
    id: i32,
    name: String,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl From<PrintCenterRow> for PrintCenter {
    fn from(row: PrintCenterRow) -> Self {
        Self {
            id: PrintCenterId::new(row.id),
            name: row.name,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AssignmentRow {
    id: i32,
    order_id: i32,
    print_center_id: i32,
    status: AssignmentStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AssignmentRow> for Assignment {
    fn from(row: AssignmentRow) -> Self {
        Self {
            id: AssignmentId::new(row.id),
            order_id: OrderId::new(row.order_id),
            print_center_id: PrintCenterId::new(row.print_center_id),
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Translate driver errors into repository errors.
fn map_sqlx_error(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::PoolTimedOut => {
            RepositoryError::Unavailable("timed out acquiring a connection".to_string())
        }
        sqlx::Error::Database(ref db_err) => {
            if db_err.constraint() == Some(ASSIGNMENT_ORDER_UNIQUE) {
                RepositoryError::DuplicateAssignment
            } else if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) {
                RepositoryError::NotFound
            } else {
                RepositoryError::Database(e)
            }
        }
        other => RepositoryError::Database(other),
    }
}

// =============================================================================
// Store
// =============================================================================

/// Store backed by a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl FulfillmentStore for PgStore {
    async fn orders_missing_coordinates(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            SELECT {ORDER_COLUMNS}
            FROM customer_order
            WHERE latitude IS NULL OR longitude IS NULL
            ORDER BY created_at, id
            "
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(Order::try_from).collect()
    }

    async fn set_order_coordinates(
        &self,
        order_id: OrderId,
        coordinates: Coordinates,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE customer_order
            SET latitude = $2, longitude = $3
            WHERE id = $1 AND (latitude IS NULL OR longitude IS NULL)
            ",
        )
        .bind(order_id)
        .bind(coordinates.latitude())
        .bind(coordinates.longitude())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn eligible_orders(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            SELECT {ORDER_COLUMNS}
            FROM customer_order o
            WHERE o.status = 'paid'
              AND NOT EXISTS (SELECT 1 FROM assignment a WHERE a.order_id = o.id)
            ORDER BY o.created_at, o.id
            "
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(Order::try_from).collect()
    }

    async fn active_print_centers(&self) -> Result<Vec<PrintCenter>, RepositoryError> {
        let rows = sqlx::query_as::<_, PrintCenterRow>(
            r"
            SELECT id, name, is_active, created_at
            FROM print_center
            WHERE is_active
            ORDER BY id
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn print_center(
        &self,
        id: PrintCenterId,
    ) -> Result<Option<PrintCenter>, RepositoryError> {
        let row = sqlx::query_as::<_, PrintCenterRow>(
            r"
            SELECT id, name, is_active, created_at
            FROM print_center
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Into::into))
    }

    async fn insert_assignment(
        &self,
        order_id: OrderId,
        print_center_id: PrintCenterId,
    ) -> Result<Assignment, RepositoryError> {
        let row = sqlx::query_as::<_, AssignmentRow>(&format!(
            r"
            INSERT INTO assignment (order_id, print_center_id, status)
            VALUES ($1, $2, $3)
            RETURNING {ASSIGNMENT_COLUMNS}
            "
        ))
        .bind(order_id)
        .bind(print_center_id)
        .bind(AssignmentStatus::Pending)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn assignment(&self, id: AssignmentId) -> Result<Option<Assignment>, RepositoryError> {
        let row = sqlx::query_as::<_, AssignmentRow>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM assignment WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Into::into))
    }

    async fn assignment_for_order(
        &self,
        order_id: OrderId,
    ) -> Result<Option<Assignment>, RepositoryError> {
        let row = sqlx::query_as::<_, AssignmentRow>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM assignment WHERE order_id = $1"
        ))
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Into::into))
    }

    async fn compare_and_set_status(
        &self,
        id: AssignmentId,
        expected: AssignmentStatus,
        next: AssignmentStatus,
    ) -> Result<Option<Assignment>, RepositoryError> {
        let row = sqlx::query_as::<_, AssignmentRow>(&format!(
            r"
            UPDATE assignment
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING {ASSIGNMENT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(expected)
        .bind(next)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Into::into))
    }

    async fn reassign_all(&self, print_center_id: PrintCenterId) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE assignment
            SET print_center_id = $1, updated_at = NOW()
            WHERE print_center_id <> $1
            ",
        )
        .bind(print_center_id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn staff_print_center(
        &self,
        user_id: StaffUserId,
    ) -> Result<Option<PrintCenterId>, RepositoryError> {
        let center = sqlx::query_scalar::<_, i32>(
            "SELECT print_center_id FROM staff_member WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(center.map(PrintCenterId::new))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}
