use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::db::{confirmed_repo, market_repo};
use crate::errors::AppError;
use crate::models::{MarketDemand, MarketInfo, PricePeriod, PricePoint, PriceStats, TopMarket};
use crate::AppState;

use super::ApiResponse;

const TOP_MARKETS_LIMIT: i64 = 10;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct TopMarketsQuery {
    pub crop_id: Option<i64>,
    pub farmer_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PriceHistoryQuery {
    pub crop_id: Option<i64>,
    pub period: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RankedMarket {
    pub rank: usize,
    #[serde(flatten)]
    pub market: TopMarket,
}

#[derive(Debug, Serialize)]
pub struct MarketDetails {
    #[serde(flatten)]
    pub market: MarketInfo,
    pub demands: Vec<MarketDemand>,
}

#[derive(Debug, Serialize)]
pub struct PriceHistory {
    pub market_id: i64,
    pub period: PricePeriod,
    pub prices: Vec<PricePoint>,
    pub stats: PriceStats,
}

/// Attach a 1-based rank in the order given.
pub fn rank_markets(markets: Vec<TopMarket>) -> Vec<RankedMarket> {
    markets
        .into_iter()
        .enumerate()
        .map(|(i, market)| RankedMarket { rank: i + 1, market })
        .collect()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/markets: active markets by name
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<MarketInfo>>>, AppError> {
    let markets = market_repo::get_markets_by_name(&state.db).await?;
    Ok(ApiResponse::ok(markets))
}

/// GET /api/markets/top: by the farmer's own history when there is any,
/// otherwise by the best price of the last 30 days
pub async fn top(
    State(state): State<AppState>,
    Query(q): Query<TopMarketsQuery>,
) -> Result<Json<ApiResponse<Vec<RankedMarket>>>, AppError> {
    let history = match q.farmer_id {
        Some(farmer_id) => confirmed_repo::count_for_farmer(&state.db, farmer_id).await? > 0,
        None => false,
    };

    let markets = match q.farmer_id {
        Some(farmer_id) if history => {
            market_repo::get_top_markets_by_history(&state.db, farmer_id, TOP_MARKETS_LIMIT).await?
        }
        _ => market_repo::get_top_markets_by_price(&state.db, q.crop_id, TOP_MARKETS_LIMIT).await?,
    };

    Ok(ApiResponse::ok(rank_markets(markets)))
}

/// GET /api/markets/demands: active demand postings, best price first
pub async fn demands(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<MarketDemand>>>, AppError> {
    let demands = market_repo::get_active_demands(&state.db, None).await?;
    Ok(ApiResponse::ok(demands))
}

/// GET /api/markets/{id}: market with its current demands
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<MarketDetails>>, AppError> {
    let market = market_repo::get_market(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("market not found".into()))?;
    let demands = market_repo::get_market_demands(&state.db, id).await?;

    Ok(ApiResponse::ok(MarketDetails { market, demands }))
}

/// GET /api/markets/{id}/prices?crop_id=&period=
pub async fn prices(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(q): Query<PriceHistoryQuery>,
) -> Result<Json<ApiResponse<PriceHistory>>, AppError> {
    let period = PricePeriod::from_query(q.period.as_deref());
    let prices =
        market_repo::get_price_history(&state.db, id, q.crop_id, period.since(Utc::now())).await?;
    let stats = PriceStats::from_points(&prices);

    Ok(ApiResponse::ok(PriceHistory {
        market_id: id,
        period,
        prices,
        stats,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeoPoint;

    fn top_market(id: i64) -> TopMarket {
        TopMarket {
            id,
            name: format!("Market {id}"),
            location_name: "Somewhere".into(),
            location: GeoPoint {
                latitude: 18.0,
                longitude: 73.0,
            },
            max_price: None,
            avg_price: None,
            avg_profit: None,
            transaction_count: 0,
        }
    }

    #[test]
    fn test_rank_is_one_based_in_query_order() {
        let ranked = rank_markets(vec![top_market(7), top_market(3)]);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].market.id, 7);
        assert_eq!(ranked[1].rank, 2);
        assert_eq!(ranked[1].market.id, 3);
    }

    #[test]
    fn test_ranked_market_serializes_flat() {
        let json = serde_json::to_value(&rank_markets(vec![top_market(4)])[0]).unwrap();
        assert_eq!(json["rank"], 1);
        assert_eq!(json["id"], 4);
        assert_eq!(json["transaction_count"], 0);
    }
}
