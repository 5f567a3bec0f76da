//! Repository and end-to-end tests against a real Postgres.
//! Run with `TEST_DATABASE_URL=... cargo test -- --ignored --test-threads=1`.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use rust_decimal::Decimal;
use tower::ServiceExt;

use agrimarket::api::router::create_router;
use agrimarket::db::{confirmed_repo, crop_repo, farmer_repo, market_repo};
use agrimarket::metrics::detached_handle;
use agrimarket::models::{
    AddCropRequest, ConfirmationRequest, PricePeriod, ProfitSummary, ProfitWindow, SpoilageRisk,
};
use agrimarket::AppState;

#[tokio::test]
#[ignore]
async fn test_latest_price_wins() {
    let pool = common::setup_test_db().await;
    let onion = common::seed_crop(&pool, "Onion", "vegetable", 30).await;
    let pune = common::seed_market(&pool, "Pune", 18.5204, 73.8567).await;

    common::seed_price(&pool, pune.id, onion.id, Decimal::from(18), 10).await;
    common::seed_price(&pool, pune.id, onion.id, Decimal::from(24), 1).await;

    let quotes = market_repo::get_latest_prices(&pool, &[onion.id]).await.unwrap();
    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0].price_per_kg, Decimal::from(24));
}

#[tokio::test]
#[ignore]
async fn test_expired_demands_are_excluded() {
    let pool = common::setup_test_db().await;
    let onion = common::seed_crop(&pool, "Onion", "vegetable", 30).await;
    let pune = common::seed_market(&pool, "Pune", 18.5204, 73.8567).await;

    let live = common::seed_demand(&pool, pune.id, onion.id, Decimal::from(30), 2).await;
    common::seed_demand(&pool, pune.id, onion.id, Decimal::from(90), -1).await;

    let demands = market_repo::get_active_demands(&pool, Some(20)).await.unwrap();
    assert_eq!(demands.len(), 1);
    assert_eq!(demands[0].id, live);
}

#[tokio::test]
#[ignore]
async fn test_crop_search_and_categories() {
    let pool = common::setup_test_db().await;
    common::seed_crop(&pool, "Tomato", "vegetable", 7).await;
    common::seed_crop(&pool, "Wheat", "grain", 180).await;

    let found = crop_repo::search_crops(&pool, "tom", 20).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Tomato");

    let categories = crop_repo::get_categories(&pool).await.unwrap();
    assert_eq!(categories, vec!["grain".to_string(), "vegetable".to_string()]);

    let grains = crop_repo::get_crops(&pool, Some("grain")).await.unwrap();
    assert_eq!(grains.len(), 1);
}

#[tokio::test]
#[ignore]
async fn test_confirmation_lifecycle() {
    let pool = common::setup_test_db().await;
    let onion = common::seed_crop(&pool, "Onion", "vegetable", 30).await;
    let pune = common::seed_market(&pool, "Pune", 18.5204, 73.8567).await;
    let farmer = common::seed_farmer(&pool, "Asha Patil", Some((18.1515, 74.5774))).await;

    let req = ConfirmationRequest {
        market_id: pune.id,
        crop_id: onion.id,
        weight_kg: Decimal::from(500),
        expected_profit: Decimal::from(4200),
        transport_cost: Decimal::from(4818),
        spoilage_risk: SpoilageRisk::Low,
    };
    let id = confirmed_repo::insert_confirmation(&pool, farmer.id, &req).await.unwrap();

    let rows = confirmed_repo::get_confirmed_for_farmer(&pool, farmer.id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].market_name, "Pune");
    assert_eq!(rows[0].status, "confirmed");
    assert_eq!(rows[0].farmer_latitude, Some(18.1515));

    let done = confirmed_repo::complete_confirmation(&pool, farmer.id, id, Some(Decimal::from(3900)))
        .await
        .unwrap();
    assert!(done);

    let rows = confirmed_repo::get_confirmed_for_farmer(&pool, farmer.id).await.unwrap();
    assert_eq!(rows[0].status, "completed");
    assert_eq!(rows[0].expected_profit, Decimal::from(3900));
    assert!(rows[0].completed_at.is_some());

    assert!(confirmed_repo::cancel_confirmation(&pool, farmer.id, id).await.unwrap());
    assert!(!confirmed_repo::cancel_confirmation(&pool, farmer.id, id).await.unwrap());
}

#[tokio::test]
#[ignore]
async fn test_analyze_uses_location_on_file() {
    let pool = common::setup_test_db().await;
    let onion = common::seed_crop(&pool, "Onion", "vegetable", 30).await;
    let pune = common::seed_market(&pool, "Pune", 18.5204, 73.8567).await;
    common::seed_market(&pool, "Mumbai", 19.0760, 72.8777).await;
    common::seed_price(&pool, pune.id, onion.id, Decimal::from(25), 1).await;
    let farmer = common::seed_farmer(&pool, "Asha Patil", Some((18.1515, 74.5774))).await;

    let state = AppState::new(pool, common::test_config(None), detached_handle());
    let app = create_router(state);

    let body = serde_json::json!({
        "farmer_id": farmer.id,
        "crops": [{ "crop_id": onion.id, "weight_kg": 500.0 }, { "crop_id": 424242, "weight_kg": 1.0 }],
    });
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/analyze")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);

    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["farmer_location"]["latitude"], 18.1515);
    assert_eq!(json["data"]["analysis"].as_array().unwrap().len(), 2);
    assert_eq!(json["data"]["skipped_crops"][0], 424242);
    // Mumbai has no onion quote.
    assert_eq!(json["data"]["defaulted_prices"].as_array().unwrap().len(), 1);
}

#[tokio::test]
#[ignore]
async fn test_farmer_crop_inventory() {
    let pool = common::setup_test_db().await;
    let onion = common::seed_crop(&pool, "Onion", "vegetable", 30).await;
    let tomato = common::seed_crop(&pool, "Tomato", "vegetable", 7).await;
    let farmer = common::seed_farmer(&pool, "Asha Patil", None).await;
    let other = common::seed_farmer(&pool, "Ravi Jadhav", None).await;

    let first = farmer_repo::add_crop(
        &pool,
        farmer.id,
        &AddCropRequest {
            crop_id: onion.id,
            weight_kg: Decimal::from(500),
            harvest_date: chrono::NaiveDate::from_ymd_opt(2024, 5, 20),
        },
    )
    .await
    .unwrap();
    let second = farmer_repo::add_crop(
        &pool,
        farmer.id,
        &AddCropRequest {
            crop_id: tomato.id,
            weight_kg: Decimal::new(1205, 1),
            harvest_date: None,
        },
    )
    .await
    .unwrap();

    let crops = farmer_repo::get_crops(&pool, farmer.id).await.unwrap();
    assert_eq!(crops.len(), 2);
    assert_eq!(crops[0].id, second);
    assert_eq!(crops[0].crop_name, "Tomato");
    assert_eq!(crops[0].shelf_life_days, 7);
    assert_eq!(crops[1].harvest_date, chrono::NaiveDate::from_ymd_opt(2024, 5, 20).unwrap());
    assert_eq!(crops[1].weight_kg, Decimal::from(500));

    // Another farmer cannot remove it.
    assert!(!farmer_repo::delete_crop(&pool, other.id, first).await.unwrap());
    assert!(farmer_repo::delete_crop(&pool, farmer.id, first).await.unwrap());
    assert_eq!(farmer_repo::get_crops(&pool, farmer.id).await.unwrap().len(), 1);
}

#[tokio::test]
#[ignore]
async fn test_profit_summary_counts_completed_only() {
    let pool = common::setup_test_db().await;
    let onion = common::seed_crop(&pool, "Onion", "vegetable", 30).await;
    let pune = common::seed_market(&pool, "Pune", 18.5204, 73.8567).await;
    let farmer = common::seed_farmer(&pool, "Asha Patil", Some((18.1515, 74.5774))).await;

    let req = ConfirmationRequest {
        market_id: pune.id,
        crop_id: onion.id,
        weight_kg: Decimal::from(100),
        expected_profit: Decimal::from(3250),
        transport_cost: Decimal::from(750),
        spoilage_risk: SpoilageRisk::Low,
    };
    let done = confirmed_repo::insert_confirmation(&pool, farmer.id, &req).await.unwrap();
    confirmed_repo::insert_confirmation(&pool, farmer.id, &req).await.unwrap();
    confirmed_repo::complete_confirmation(&pool, farmer.id, done, Some(Decimal::from(3900)))
        .await
        .unwrap();

    let window = ProfitWindow::for_period(PricePeriod::Month, chrono::Utc::now());
    let totals = confirmed_repo::get_profit_totals(&pool, farmer.id, &window).await.unwrap();
    let history = confirmed_repo::get_daily_profit(&pool, farmer.id, &window).await.unwrap();
    let summary = ProfitSummary::new(totals, history);

    assert_eq!(summary.total_transactions, 1);
    assert_eq!(summary.total_profit, Decimal::from(3900));
    assert_eq!(summary.total_transport_cost, Decimal::from(750));
    assert_eq!(summary.net_profit, Decimal::from(3150));
    assert_eq!(summary.history.len(), 1);
    assert_eq!(summary.history[0].profit, Decimal::from(3150));

    // A range that ends before today sees nothing.
    let yesterday = chrono::Utc::now().date_naive() - chrono::Duration::days(1);
    let past = ProfitWindow::for_dates(yesterday, yesterday).unwrap();
    let totals = confirmed_repo::get_profit_totals(&pool, farmer.id, &past).await.unwrap();
    assert_eq!(totals.total_transactions, 0);
    assert_eq!(totals.total_profit, Decimal::ZERO);
}
