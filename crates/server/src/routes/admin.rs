//! Operator routes: batch maintenance jobs and the center listing.
//!
//! Each job returns its report as JSON. Batch jobs succeed even when some
//! items failed; the failures are listed in the report.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use print_router_core::PrintCenterId;

use crate::error::AppError;
use crate::middleware::RequireOperator;
use crate::models::PrintCenter;
use crate::services::{
    AssignmentEngine, AssignmentReport, CoordinateNormalizer, NormalizationReport,
    PrintCenterRegistry, ReassignReport,
};
use crate::state::AppState;

/// Body of `POST /admin/assignments/reassign`.
#[derive(Debug, Deserialize)]
pub struct ReassignRequest {
    pub print_center_id: PrintCenterId,
}

/// `POST /admin/assignments/run`
#[instrument(skip_all, fields(operator = %operator.id))]
pub async fn run_assignment(
    State(state): State<AppState>,
    RequireOperator(operator): RequireOperator,
) -> Result<Json<AssignmentReport>, AppError> {
    let report = AssignmentEngine::new(state.store(), state.fallback_coordinates())
        .assign_unassigned_orders()
        .await?;
    Ok(Json(report))
}

/// `POST /admin/assignments/reassign`
#[instrument(skip_all, fields(operator = %operator.id, print_center_id = %body.print_center_id))]
pub async fn reassign_all(
    State(state): State<AppState>,
    RequireOperator(operator): RequireOperator,
    Json(body): Json<ReassignRequest>,
) -> Result<Json<ReassignReport>, AppError> {
    let report = AssignmentEngine::new(state.store(), state.fallback_coordinates())
        .reassign_all(body.print_center_id)
        .await?;
    Ok(Json(report))
}

/// `POST /admin/orders/normalize`
#[instrument(skip_all, fields(operator = %operator.id))]
pub async fn normalize_coordinates(
    State(state): State<AppState>,
    RequireOperator(operator): RequireOperator,
) -> Result<Json<NormalizationReport>, AppError> {
    let report = CoordinateNormalizer::new(state.store(), state.fallback_coordinates())
        .run()
        .await?;
    Ok(Json(report))
}

/// `GET /admin/centers`
pub async fn centers(
    State(state): State<AppState>,
    RequireOperator(_): RequireOperator,
) -> Result<Json<Vec<PrintCenter>>, AppError> {
    let centers = PrintCenterRegistry::new(state.store())
        .eligible_centers()
        .await?;
    Ok(Json(centers))
}
