use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmedStatus {
    Confirmed,
    Completed,
}

impl ConfirmedStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfirmedStatus::Confirmed => "confirmed",
            ConfirmedStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for ConfirmedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A farmer-accepted (crop, market) pairing, joined with market, crop and
/// farmer details for display.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ConfirmedMarket {
    pub id: i64,
    pub farmer_id: i64,
    pub market_id: i64,
    pub market_name: String,
    pub market_location: String,
    pub market_latitude: f64,
    pub market_longitude: f64,
    pub crop_id: i64,
    pub crop_name: String,
    pub weight_kg: Decimal,
    pub expected_profit: Decimal,
    pub transport_cost: Decimal,
    pub spoilage_risk: String,
    pub status: String,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub farmer_location: Option<String>,
    pub farmer_latitude: Option<f64>,
    pub farmer_longitude: Option<f64>,
}
