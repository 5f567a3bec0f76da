use chrono::{DateTime, Duration, Months, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::GeoPoint;

/// Database row for an active market candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct MarketInfo {
    pub id: i64,
    pub name: String,
    pub location_name: String,
    #[sqlx(flatten)]
    pub location: GeoPoint,
}

/// Most recent recorded price for a crop at a market.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PriceQuote {
    pub market_id: i64,
    pub crop_id: i64,
    pub price_per_kg: Decimal,
    pub recorded_at: DateTime<Utc>,
}

/// Single entry of a market's price history.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PricePoint {
    pub crop_id: i64,
    pub price_per_kg: Decimal,
    pub recorded_at: DateTime<Utc>,
}

/// Active demand posting joined with its market and crop.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MarketDemand {
    pub id: i64,
    pub market_id: i64,
    pub market_name: String,
    pub location_name: String,
    #[sqlx(flatten)]
    pub market_location: GeoPoint,
    pub crop_id: i64,
    pub crop_name: String,
    pub demand_price_per_kg: Decimal,
    pub quantity_needed_kg: Decimal,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: DateTime<Utc>,
}

/// Aggregated market row for the top-markets ranking. Which aggregate
/// columns are populated depends on the ranking basis.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TopMarket {
    pub id: i64,
    pub name: String,
    pub location_name: String,
    #[sqlx(flatten)]
    pub location: GeoPoint,
    pub max_price: Option<Decimal>,
    pub avg_price: Option<Decimal>,
    pub avg_profit: Option<Decimal>,
    pub transaction_count: i64,
}

// ---------------------------------------------------------------------------
// Price history window
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PricePeriod {
    Day,
    Month,
    FiveMonths,
    Year,
    Max,
}

impl PricePeriod {
    /// Parse the `period` query value. Unknown or missing values mean `Max`.
    pub fn from_query(s: Option<&str>) -> Self {
        match s.map(str::trim) {
            Some("1d") => PricePeriod::Day,
            Some("1m") => PricePeriod::Month,
            Some("5m") => PricePeriod::FiveMonths,
            Some("1y") => PricePeriod::Year,
            _ => PricePeriod::Max,
        }
    }

    /// Start of the window relative to `now`; `None` means unbounded.
    pub fn since(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            PricePeriod::Day => Some(now - Duration::days(1)),
            PricePeriod::Month => now.checked_sub_months(Months::new(1)),
            PricePeriod::FiveMonths => now.checked_sub_months(Months::new(5)),
            PricePeriod::Year => now.checked_sub_months(Months::new(12)),
            PricePeriod::Max => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceStats {
    pub highest: Decimal,
    pub lowest: Decimal,
    pub average: Decimal,
}

impl PriceStats {
    /// Summary statistics; all zero for an empty history.
    pub fn from_points(points: &[PricePoint]) -> Self {
        if points.is_empty() {
            return Self {
                highest: Decimal::ZERO,
                lowest: Decimal::ZERO,
                average: Decimal::ZERO,
            };
        }

        let prices = points.iter().map(|p| p.price_per_kg);
        let highest = prices.clone().max().unwrap_or(Decimal::ZERO);
        let lowest = prices.clone().min().unwrap_or(Decimal::ZERO);
        let average = prices.sum::<Decimal>() / Decimal::from(points.len() as i64);

        Self {
            highest,
            lowest,
            average,
        }
    }
}
