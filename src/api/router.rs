use axum::middleware;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;
use super::auth::require_auth;
use super::handlers;

pub fn create_router(state: AppState) -> Router {
    // Public routes
    let public = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::render));

    // API routes, behind the bearer gate when API_TOKEN is set
    let protected = Router::new()
        // Analysis
        .route("/api/analyze", post(handlers::analyze::analyze))
        // Farmers
        .route(
            "/api/farmers/:farmer_id/location",
            get(handlers::farmers::get_location).put(handlers::farmers::update_location),
        )
        .route(
            "/api/farmers/:farmer_id/crops",
            get(handlers::farmers::list_crops).post(handlers::farmers::add_crop),
        )
        .route(
            "/api/farmers/:farmer_id/crops/:id",
            delete(handlers::farmers::delete_crop),
        )
        .route("/api/farmers/:farmer_id/profit", get(handlers::farmers::profit_summary))
        .route(
            "/api/farmers/:farmer_id/confirmed",
            get(handlers::confirmed::list).post(handlers::confirmed::confirm),
        )
        .route(
            "/api/farmers/:farmer_id/confirmed/:id/complete",
            put(handlers::confirmed::complete),
        )
        .route(
            "/api/farmers/:farmer_id/confirmed/:id",
            delete(handlers::confirmed::cancel),
        )
        // Markets
        .route("/api/markets", get(handlers::markets::list))
        .route("/api/markets/top", get(handlers::markets::top))
        .route("/api/markets/demands", get(handlers::markets::demands))
        .route("/api/markets/:id", get(handlers::markets::detail))
        .route("/api/markets/:id/prices", get(handlers::markets::prices))
        // Crops
        .route("/api/crops", get(handlers::crops::list))
        .route("/api/crops/categories", get(handlers::crops::categories))
        .route("/api/crops/search", get(handlers::crops::search))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    public
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
