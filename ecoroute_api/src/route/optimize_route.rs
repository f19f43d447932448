use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use ecoroute_core::optimizer::{OptimizationResult, OptimizeRouteRequest};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn optimize_route_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<OptimizeRouteRequest>, JsonRejection>,
) -> Result<Json<OptimizationResult>, ApiError> {
    let Json(request) = body?;

    let result = tokio::time::timeout(
        state.request_deadline,
        state.optimizer.optimize_route(&request),
    )
    .await
    .map_err(|_| {
        ApiError::InternalServerError(format!(
            "Optimization from {:?} to {:?} exceeded the deadline of {:?}",
            request.start, request.end, state.request_deadline
        ))
    })??;

    Ok(Json(result))
}

pub async fn preflight_handler() -> StatusCode {
    StatusCode::NO_CONTENT
}
