use axum::extract::State;
use axum::Json;

use crate::errors::AppError;
use crate::models::AnalyzeRequest;
use crate::services::analysis::{self, AnalysisOutcome};
use crate::AppState;

use super::ApiResponse;

/// POST /api/analyze: rank every requested crop against every active
/// market, or scan posted demands when no crops are given
pub async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<ApiResponse<AnalysisOutcome>>, AppError> {
    let outcome = analysis::run_analysis(&state.db, &state.ranker, &req).await?;
    Ok(ApiResponse::ok(outcome))
}
