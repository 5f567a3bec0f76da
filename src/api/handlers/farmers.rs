use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::db::{confirmed_repo, crop_repo, farmer_repo};
use crate::errors::AppError;
use crate::models::{
    AddCropRequest, Farmer, FarmerCrop, GeoPoint, PricePeriod, ProfitSummary, ProfitWindow,
};
use crate::AppState;

use super::ApiResponse;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct UpdateLocationRequest {
    pub location_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Serialize)]
pub struct FarmerLocation {
    pub farmer_id: i64,
    pub location_name: Option<String>,
    pub location: Option<GeoPoint>,
}

impl From<&Farmer> for FarmerLocation {
    fn from(f: &Farmer) -> Self {
        Self {
            farmer_id: f.id,
            location_name: f.location_name.clone(),
            location: f.location(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FarmerCropId {
    pub id: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfitQuery {
    pub period: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ProfitQuery {
    /// An explicit date range wins over `period` when both ends are given.
    pub fn window(&self) -> Result<ProfitWindow, AppError> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => ProfitWindow::for_dates(start, end)
                .ok_or_else(|| AppError::BadRequest("start_date must not be after end_date".into())),
            _ => Ok(ProfitWindow::for_period(
                PricePeriod::from_query(self.period.as_deref()),
                Utc::now(),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// GET /api/farmers/{farmer_id}/location
pub async fn get_location(
    State(state): State<AppState>,
    Path(farmer_id): Path<i64>,
) -> Result<Json<ApiResponse<FarmerLocation>>, AppError> {
    let farmer = farmer_repo::get_farmer(&state.db, farmer_id)
        .await?
        .ok_or_else(|| AppError::NotFound("farmer not found".into()))?;

    Ok(ApiResponse::ok(FarmerLocation::from(&farmer)))
}

/// PUT /api/farmers/{farmer_id}/location
pub async fn update_location(
    State(state): State<AppState>,
    Path(farmer_id): Path<i64>,
    Json(req): Json<UpdateLocationRequest>,
) -> Result<Json<ApiResponse<FarmerLocation>>, AppError> {
    let point = GeoPoint::new(req.latitude, req.longitude)?;
    let name = req.location_name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("location_name is required".into()));
    }

    let farmer = farmer_repo::update_location(
        &state.db,
        farmer_id,
        name,
        point.latitude,
        point.longitude,
    )
    .await?
    .ok_or_else(|| AppError::NotFound("farmer not found".into()))?;

    tracing::info!(farmer_id, location = %point, "Farmer location updated");
    Ok(ApiResponse::ok(FarmerLocation::from(&farmer)))
}

// ---------------------------------------------------------------------------
// Crop inventory
// ---------------------------------------------------------------------------

/// POST /api/farmers/{farmer_id}/crops
pub async fn add_crop(
    State(state): State<AppState>,
    Path(farmer_id): Path<i64>,
    Json(req): Json<AddCropRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FarmerCropId>>), AppError> {
    if req.weight_kg <= Decimal::ZERO {
        return Err(AppError::BadRequest("weight_kg must be positive".into()));
    }

    farmer_repo::get_farmer(&state.db, farmer_id)
        .await?
        .ok_or_else(|| AppError::NotFound("farmer not found".into()))?;
    if crop_repo::get_crops_by_ids(&state.db, &[req.crop_id]).await?.is_empty() {
        return Err(AppError::NotFound("crop not found".into()));
    }

    let id = farmer_repo::add_crop(&state.db, farmer_id, &req).await?;
    tracing::info!(farmer_id, crop_id = req.crop_id, weight_kg = %req.weight_kg, "Crop added");

    Ok((StatusCode::CREATED, ApiResponse::ok(FarmerCropId { id })))
}

/// GET /api/farmers/{farmer_id}/crops: newest first
pub async fn list_crops(
    State(state): State<AppState>,
    Path(farmer_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<FarmerCrop>>>, AppError> {
    let crops = farmer_repo::get_crops(&state.db, farmer_id).await?;
    Ok(ApiResponse::ok(crops))
}

/// DELETE /api/farmers/{farmer_id}/crops/{id}
pub async fn delete_crop(
    State(state): State<AppState>,
    Path((farmer_id, id)): Path<(i64, i64)>,
) -> Result<Json<ApiResponse<FarmerCropId>>, AppError> {
    if !farmer_repo::delete_crop(&state.db, farmer_id, id).await? {
        return Err(AppError::NotFound("crop not found".into()));
    }

    tracing::info!(farmer_id, id, "Crop removed");
    Ok(ApiResponse::ok(FarmerCropId { id }))
}

// ---------------------------------------------------------------------------
// Profit
// ---------------------------------------------------------------------------

/// GET /api/farmers/{farmer_id}/profit?period=|start_date=&end_date=
pub async fn profit_summary(
    State(state): State<AppState>,
    Path(farmer_id): Path<i64>,
    Query(q): Query<ProfitQuery>,
) -> Result<Json<ApiResponse<ProfitSummary>>, AppError> {
    let window = q.window()?;

    let (totals, history) = tokio::try_join!(
        confirmed_repo::get_profit_totals(&state.db, farmer_id, &window),
        confirmed_repo::get_daily_profit(&state.db, farmer_id, &window),
    )?;

    Ok(ApiResponse::ok(ProfitSummary::new(totals, history)))
}
