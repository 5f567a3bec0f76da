use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use metrics::counter;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::db::{confirmed_repo, farmer_repo};
use crate::errors::AppError;
use crate::models::{ConfirmationRequest, ConfirmedMarket};
use crate::AppState;

use super::ApiResponse;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ConfirmedId {
    pub id: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct CompleteRequest {
    pub actual_profit: Option<Decimal>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/farmers/{farmer_id}/confirmed: accept a recommendation
pub async fn confirm(
    State(state): State<AppState>,
    Path(farmer_id): Path<i64>,
    Json(req): Json<ConfirmationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ConfirmedId>>), AppError> {
    if req.weight_kg <= Decimal::ZERO {
        return Err(AppError::BadRequest("weight_kg must be positive".into()));
    }

    farmer_repo::get_farmer(&state.db, farmer_id)
        .await?
        .ok_or_else(|| AppError::NotFound("farmer not found".into()))?;

    let id = confirmed_repo::insert_confirmation(&state.db, farmer_id, &req).await?;
    counter!("markets_confirmed_total").increment(1);

    tracing::info!(
        farmer_id,
        market_id = req.market_id,
        crop_id = req.crop_id,
        expected_profit = %req.expected_profit,
        "Market confirmed"
    );

    Ok((StatusCode::CREATED, ApiResponse::ok(ConfirmedId { id })))
}

/// GET /api/farmers/{farmer_id}/confirmed: newest first
pub async fn list(
    State(state): State<AppState>,
    Path(farmer_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<ConfirmedMarket>>>, AppError> {
    let rows = confirmed_repo::get_confirmed_for_farmer(&state.db, farmer_id).await?;
    Ok(ApiResponse::ok(rows))
}

/// PUT /api/farmers/{farmer_id}/confirmed/{id}/complete
pub async fn complete(
    State(state): State<AppState>,
    Path((farmer_id, id)): Path<(i64, i64)>,
    body: Option<Json<CompleteRequest>>,
) -> Result<Json<ApiResponse<ConfirmedId>>, AppError> {
    let actual_profit = body.and_then(|Json(b)| b.actual_profit);

    let updated =
        confirmed_repo::complete_confirmation(&state.db, farmer_id, id, actual_profit).await?;
    if !updated {
        return Err(AppError::NotFound("confirmed market not found".into()));
    }

    tracing::info!(farmer_id, id, actual_profit = ?actual_profit, "Confirmed market completed");
    Ok(ApiResponse::ok(ConfirmedId { id }))
}

/// DELETE /api/farmers/{farmer_id}/confirmed/{id}: cancel
pub async fn cancel(
    State(state): State<AppState>,
    Path((farmer_id, id)): Path<(i64, i64)>,
) -> Result<Json<ApiResponse<ConfirmedId>>, AppError> {
    if !confirmed_repo::cancel_confirmation(&state.db, farmer_id, id).await? {
        return Err(AppError::NotFound("confirmed market not found".into()));
    }

    tracing::info!(farmer_id, id, "Confirmed market cancelled");
    Ok(ApiResponse::ok(ConfirmedId { id }))
}
