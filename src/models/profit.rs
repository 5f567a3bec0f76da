use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::PricePeriod;

/// Aggregates over a farmer's completed confirmations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ProfitTotals {
    pub total_profit: Decimal,
    pub total_transport_cost: Decimal,
    pub total_transactions: i64,
}

/// Net profit realised on one calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DailyProfit {
    pub date: NaiveDate,
    pub profit: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfitSummary {
    pub total_profit: Decimal,
    pub total_transport_cost: Decimal,
    pub total_transactions: i64,
    pub net_profit: Decimal,
    pub history: Vec<DailyProfit>,
}

impl ProfitSummary {
    pub fn new(totals: ProfitTotals, history: Vec<DailyProfit>) -> Self {
        Self {
            net_profit: totals.total_profit - totals.total_transport_cost,
            total_profit: totals.total_profit,
            total_transport_cost: totals.total_transport_cost,
            total_transactions: totals.total_transactions,
            history,
        }
    }
}

// ---------------------------------------------------------------------------
// Reporting window
// ---------------------------------------------------------------------------

/// Half-open `[from, to)` bounds on `confirmed_at` for the totals, plus the
/// start of the daily series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfitWindow {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub history_from: Option<DateTime<Utc>>,
}

/// How far back the daily series reaches when no period bounds it.
const MAX_HISTORY_MONTHS: u32 = 60;

impl ProfitWindow {
    /// Trailing window ending now. `Max` leaves the totals unbounded but
    /// caps the daily series at five years.
    pub fn for_period(period: PricePeriod, now: DateTime<Utc>) -> Self {
        let from = period.since(now);
        let history_from = match period {
            PricePeriod::Max => now.checked_sub_months(Months::new(MAX_HISTORY_MONTHS)),
            _ => from,
        };

        Self {
            from,
            to: None,
            history_from,
        }
    }

    /// Inclusive calendar-date range. Returns `None` when `start` is after
    /// `end`.
    pub fn for_dates(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        if start > end {
            return None;
        }

        let from = start.and_hms_opt(0, 0, 0)?.and_utc();
        let to = end.and_hms_opt(0, 0, 0)?.and_utc() + Duration::days(1);

        Some(Self {
            from: Some(from),
            to: Some(to),
            history_from: Some(from),
        })
    }
}
