use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::db::crop_repo;
use crate::errors::AppError;
use crate::models::CropInfo;
use crate::AppState;

use super::ApiResponse;

const SEARCH_LIMIT: i64 = 20;

#[derive(Debug, Default, Deserialize)]
pub struct CropsQuery {
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// GET /api/crops?category=
pub async fn list(
    State(state): State<AppState>,
    Query(q): Query<CropsQuery>,
) -> Result<Json<ApiResponse<Vec<CropInfo>>>, AppError> {
    let category = q.category.as_deref().map(str::trim).filter(|c| !c.is_empty());
    let crops = crop_repo::get_crops(&state.db, category).await?;
    Ok(ApiResponse::ok(crops))
}

/// GET /api/crops/categories
pub async fn categories(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<String>>>, AppError> {
    let categories = crop_repo::get_categories(&state.db).await?;
    Ok(ApiResponse::ok(categories))
}

/// GET /api/crops/search?q=
pub async fn search(
    State(state): State<AppState>,
    Query(q): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<CropInfo>>>, AppError> {
    let query = q
        .q
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("Search query required".into()))?;

    let crops = crop_repo::search_crops(&state.db, query, SEARCH_LIMIT).await?;
    Ok(ApiResponse::ok(crops))
}
