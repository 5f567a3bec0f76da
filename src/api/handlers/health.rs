use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::AppState;

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let markets: Result<(i64,), _> =
        sqlx::query_as("SELECT COUNT(*) FROM markets WHERE is_active = TRUE")
            .fetch_one(&state.db)
            .await;

    match markets {
        Ok((active_markets,)) => (
            StatusCode::OK,
            Json(json!({ "status": "healthy", "active_markets": active_markets })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the database");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unhealthy", "db": "disconnected" })),
            )
        }
    }
}
