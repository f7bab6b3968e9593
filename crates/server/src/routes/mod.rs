//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness
//! GET  /health/ready                - Readiness (store ping)
//!
//! # Public
//! GET  /track/{order_id}            - Tracking projection, no authentication
//!
//! # Operators
//! POST /admin/assignments/run       - Assign every unassigned paid order
//! POST /admin/assignments/reassign  - Move all assignments to one center
//! POST /admin/orders/normalize      - Fill missing order coordinates
//! GET  /admin/centers               - Eligible print centers
//!
//! # Center staff
//! POST /assignments/{id}/status     - Lifecycle transition
//! ```

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub mod admin;
pub mod assignments;
pub mod health;
pub mod tracking;

/// All routes, without middleware.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/track/{order_id}", get(tracking::track))
        .route("/admin/assignments/run", post(admin::run_assignment))
        .route("/admin/assignments/reassign", post(admin::reassign_all))
        .route("/admin/orders/normalize", post(admin::normalize_coordinates))
        .route("/admin/centers", get(admin::centers))
        .route("/assignments/{id}/status", post(assignments::transition))
}
