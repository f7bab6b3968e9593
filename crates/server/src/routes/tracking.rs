//! Public tracking route.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use print_router_core::OrderId;

use crate::error::AppError;
use crate::models::TrackingView;
use crate::services::TrackingGateway;
use crate::state::AppState;

/// `GET /track/{order_id}`
///
/// Unauthenticated. Responds with the tracking projection or 404. The path
/// segment is taken as text so that a malformed ID gets the same 404 as an
/// unknown one.
#[instrument(skip(state))]
pub async fn track(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<TrackingView>, AppError> {
    let order_id = order_id
        .parse::<i32>()
        .map(OrderId::new)
        .map_err(|_| AppError::NotFound(format!("order {order_id}")))?;
    let view = TrackingGateway::new(state.store()).track(order_id).await?;
    Ok(Json(view))
}
