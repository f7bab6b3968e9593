//! Center staff routes.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use print_router_core::AssignmentId;

use crate::error::AppError;
use crate::middleware::RequireStaff;
use crate::models::Assignment;
use crate::services::{LifecycleService, TransitionRequest};
use crate::state::AppState;

/// `POST /assignments/{id}/status`
///
/// Body: `{"status": "PRINTING", "expected": "PENDING"}` (`expected` optional).
#[instrument(skip_all, fields(staff = %staff.id, assignment_id = %id))]
pub async fn transition(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<AssignmentId>,
    Json(request): Json<TransitionRequest>,
) -> Result<Json<Assignment>, AppError> {
    let assignment = LifecycleService::new(state.store())
        .transition(staff.id, id, request)
        .await?;
    Ok(Json(assignment))
}
