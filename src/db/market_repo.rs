use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::{MarketDemand, MarketInfo, PricePoint, PriceQuote, TopMarket};

/// All active markets, ordered by id for a stable evaluation order.
pub async fn get_active_markets(pool: &PgPool) -> anyhow::Result<Vec<MarketInfo>> {
    let markets = sqlx::query_as::<_, MarketInfo>(
        r#"
        SELECT id, name, location_name, latitude, longitude
        FROM markets
        WHERE is_active = TRUE
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(markets)
}

/// Active markets ordered by name, for listings.
pub async fn get_markets_by_name(pool: &PgPool) -> anyhow::Result<Vec<MarketInfo>> {
    let markets = sqlx::query_as::<_, MarketInfo>(
        r#"
        SELECT id, name, location_name, latitude, longitude
        FROM markets
        WHERE is_active = TRUE
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(markets)
}

/// Get a single market by id, active or not.
pub async fn get_market(pool: &PgPool, id: i64) -> anyhow::Result<Option<MarketInfo>> {
    let market = sqlx::query_as::<_, MarketInfo>(
        "SELECT id, name, location_name, latitude, longitude FROM markets WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(market)
}

/// Most recent price for every (market, crop) pair among `crop_ids`.
pub async fn get_latest_prices(pool: &PgPool, crop_ids: &[i64]) -> anyhow::Result<Vec<PriceQuote>> {
    let quotes = sqlx::query_as::<_, PriceQuote>(
        r#"
        SELECT DISTINCT ON (market_id, crop_id)
               market_id, crop_id, price_per_kg, recorded_at
        FROM price_history
        WHERE crop_id = ANY($1)
        ORDER BY market_id, crop_id, recorded_at DESC, id DESC
        "#,
    )
    .bind(crop_ids)
    .fetch_all(pool)
    .await?;

    Ok(quotes)
}

/// Active, unexpired demand postings, highest posted price first.
pub async fn get_active_demands(pool: &PgPool, limit: Option<i64>) -> anyhow::Result<Vec<MarketDemand>> {
    let demands = sqlx::query_as::<_, MarketDemand>(
        r#"
        SELECT md.id, md.market_id, m.name AS market_name, m.location_name,
               m.latitude, m.longitude,
               md.crop_id, c.name AS crop_name,
               md.demand_price_per_kg, md.quantity_needed_kg,
               md.valid_from, md.valid_until
        FROM market_demands md
        JOIN markets m ON m.id = md.market_id
        JOIN crops c ON c.id = md.crop_id
        WHERE md.is_active = TRUE AND md.valid_until > NOW()
        ORDER BY md.demand_price_per_kg DESC, md.id
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(demands)
}

/// Current demand postings for one market.
pub async fn get_market_demands(pool: &PgPool, market_id: i64) -> anyhow::Result<Vec<MarketDemand>> {
    let demands = sqlx::query_as::<_, MarketDemand>(
        r#"
        SELECT md.id, md.market_id, m.name AS market_name, m.location_name,
               m.latitude, m.longitude,
               md.crop_id, c.name AS crop_name,
               md.demand_price_per_kg, md.quantity_needed_kg,
               md.valid_from, md.valid_until
        FROM market_demands md
        JOIN markets m ON m.id = md.market_id
        JOIN crops c ON c.id = md.crop_id
        WHERE md.market_id = $1 AND md.is_active = TRUE AND md.valid_until > NOW()
        ORDER BY md.demand_price_per_kg DESC, md.id
        "#,
    )
    .bind(market_id)
    .fetch_all(pool)
    .await?;

    Ok(demands)
}

/// Price history for a market, oldest first.
pub async fn get_price_history(
    pool: &PgPool,
    market_id: i64,
    crop_id: Option<i64>,
    since: Option<DateTime<Utc>>,
) -> anyhow::Result<Vec<PricePoint>> {
    let points = sqlx::query_as::<_, PricePoint>(
        r#"
        SELECT crop_id, price_per_kg, recorded_at
        FROM price_history
        WHERE market_id = $1
          AND ($2::BIGINT IS NULL OR crop_id = $2)
          AND ($3::TIMESTAMPTZ IS NULL OR recorded_at >= $3)
        ORDER BY recorded_at ASC
        "#,
    )
    .bind(market_id)
    .bind(crop_id)
    .bind(since)
    .fetch_all(pool)
    .await?;

    Ok(points)
}

/// Top markets by highest price recorded in the last 30 days.
pub async fn get_top_markets_by_price(
    pool: &PgPool,
    crop_id: Option<i64>,
    limit: i64,
) -> anyhow::Result<Vec<TopMarket>> {
    let rows = sqlx::query_as::<_, TopMarket>(
        r#"
        SELECT m.id, m.name, m.location_name, m.latitude, m.longitude,
               MAX(ph.price_per_kg) AS max_price,
               AVG(ph.price_per_kg) AS avg_price,
               NULL::NUMERIC AS avg_profit,
               0::BIGINT AS transaction_count
        FROM markets m
        LEFT JOIN price_history ph ON ph.market_id = m.id
          AND ph.recorded_at >= NOW() - INTERVAL '30 days'
          AND ($1::BIGINT IS NULL OR ph.crop_id = $1)
        WHERE m.is_active = TRUE
        GROUP BY m.id
        ORDER BY max_price DESC NULLS LAST, m.id
        LIMIT $2
        "#,
    )
    .bind(crop_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Top markets by a farmer's own confirmed-profit history.
pub async fn get_top_markets_by_history(
    pool: &PgPool,
    farmer_id: i64,
    limit: i64,
) -> anyhow::Result<Vec<TopMarket>> {
    let rows = sqlx::query_as::<_, TopMarket>(
        r#"
        SELECT m.id, m.name, m.location_name, m.latitude, m.longitude,
               NULL::NUMERIC AS max_price,
               NULL::NUMERIC AS avg_price,
               AVG(cm.expected_profit) AS avg_profit,
               COUNT(cm.id) AS transaction_count
        FROM markets m
        LEFT JOIN confirmed_markets cm ON cm.market_id = m.id AND cm.farmer_id = $1
        WHERE m.is_active = TRUE
        GROUP BY m.id
        ORDER BY avg_profit DESC NULLS LAST, transaction_count DESC, m.id
        LIMIT $2
        "#,
    )
    .bind(farmer_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
