use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::models::{
    ConfirmationRequest, ConfirmedMarket, ConfirmedStatus, DailyProfit, ProfitTotals, ProfitWindow,
};

/// Persist a confirmed recommendation, returning the new row id.
pub async fn insert_confirmation(
    pool: &PgPool,
    farmer_id: i64,
    req: &ConfirmationRequest,
) -> anyhow::Result<i64> {
    let row: (i64,) = sqlx::query_as(
        r#"
        INSERT INTO confirmed_markets
            (farmer_id, market_id, crop_id, weight_kg, expected_profit, transport_cost, spoilage_risk, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id
        "#,
    )
    .bind(farmer_id)
    .bind(req.market_id)
    .bind(req.crop_id)
    .bind(req.weight_kg)
    .bind(req.expected_profit)
    .bind(req.transport_cost)
    .bind(req.spoilage_risk.as_str())
    .bind(ConfirmedStatus::Confirmed.as_str())
    .fetch_one(pool)
    .await?;

    Ok(row.0)
}

/// All confirmations for a farmer, newest first.
pub async fn get_confirmed_for_farmer(
    pool: &PgPool,
    farmer_id: i64,
) -> anyhow::Result<Vec<ConfirmedMarket>> {
    let rows = sqlx::query_as::<_, ConfirmedMarket>(
        r#"
        SELECT cm.id, cm.farmer_id, cm.weight_kg, cm.expected_profit, cm.transport_cost,
               cm.spoilage_risk, cm.status, cm.confirmed_at, cm.completed_at,
               m.id AS market_id, m.name AS market_name, m.location_name AS market_location,
               m.latitude AS market_latitude, m.longitude AS market_longitude,
               c.id AS crop_id, c.name AS crop_name,
               f.location_name AS farmer_location,
               f.latitude AS farmer_latitude, f.longitude AS farmer_longitude
        FROM confirmed_markets cm
        JOIN markets m ON m.id = cm.market_id
        JOIN crops c ON c.id = cm.crop_id
        JOIN farmers f ON f.id = cm.farmer_id
        WHERE cm.farmer_id = $1
        ORDER BY cm.confirmed_at DESC, cm.id DESC
        "#,
    )
    .bind(farmer_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Mark a confirmation completed, replacing the expected profit with the
/// realised one when given. Returns false if no such confirmation exists.
pub async fn complete_confirmation(
    pool: &PgPool,
    farmer_id: i64,
    id: i64,
    actual_profit: Option<Decimal>,
) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE confirmed_markets
        SET status = $3, completed_at = NOW(),
            expected_profit = COALESCE($4, expected_profit)
        WHERE id = $1 AND farmer_id = $2
        "#,
    )
    .bind(id)
    .bind(farmer_id)
    .bind(ConfirmedStatus::Completed.as_str())
    .bind(actual_profit)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Cancel (delete) a confirmation. Returns false if it did not exist.
pub async fn cancel_confirmation(pool: &PgPool, farmer_id: i64, id: i64) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM confirmed_markets WHERE id = $1 AND farmer_id = $2")
        .bind(id)
        .bind(farmer_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Count confirmations recorded by a farmer.
pub async fn count_for_farmer(pool: &PgPool, farmer_id: i64) -> anyhow::Result<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM confirmed_markets WHERE farmer_id = $1")
        .bind(farmer_id)
        .fetch_one(pool)
        .await?;

    Ok(row.0)
}

/// Totals over completed confirmations inside the window.
pub async fn get_profit_totals(
    pool: &PgPool,
    farmer_id: i64,
    window: &ProfitWindow,
) -> anyhow::Result<ProfitTotals> {
    let totals = sqlx::query_as::<_, ProfitTotals>(
        r#"
        SELECT COALESCE(SUM(expected_profit), 0) AS total_profit,
               COALESCE(SUM(transport_cost), 0) AS total_transport_cost,
               COUNT(*) AS total_transactions
        FROM confirmed_markets
        WHERE farmer_id = $1 AND status = $2
          AND ($3::TIMESTAMPTZ IS NULL OR confirmed_at >= $3)
          AND ($4::TIMESTAMPTZ IS NULL OR confirmed_at < $4)
        "#,
    )
    .bind(farmer_id)
    .bind(ConfirmedStatus::Completed.as_str())
    .bind(window.from)
    .bind(window.to)
    .fetch_one(pool)
    .await?;

    Ok(totals)
}

/// Net profit of completed confirmations per UTC day, oldest first.
pub async fn get_daily_profit(
    pool: &PgPool,
    farmer_id: i64,
    window: &ProfitWindow,
) -> anyhow::Result<Vec<DailyProfit>> {
    let rows = sqlx::query_as::<_, DailyProfit>(
        r#"
        SELECT (confirmed_at AT TIME ZONE 'UTC')::DATE AS date,
               SUM(expected_profit - transport_cost) AS profit
        FROM confirmed_markets
        WHERE farmer_id = $1 AND status = $2 AND confirmed_at IS NOT NULL
          AND ($3::TIMESTAMPTZ IS NULL OR confirmed_at >= $3)
          AND ($4::TIMESTAMPTZ IS NULL OR confirmed_at < $4)
        GROUP BY 1
        ORDER BY 1
        "#,
    )
    .bind(farmer_id)
    .bind(ConfirmedStatus::Completed.as_str())
    .bind(window.history_from)
    .bind(window.to)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
