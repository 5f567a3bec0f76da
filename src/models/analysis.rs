use chrono::{DateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::GeoPoint;
use crate::errors::AnalysisError;

// ---------------------------------------------------------------------------
// SpoilageRisk
// ---------------------------------------------------------------------------

/// Share of a crop's shelf life consumed in transit, bucketed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpoilageRisk {
    Low,
    Medium,
    High,
}

impl SpoilageRisk {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpoilageRisk::Low => "low",
            SpoilageRisk::Medium => "medium",
            SpoilageRisk::High => "high",
        }
    }
}

impl fmt::Display for SpoilageRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Quantity of a crop a farmer wants evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRequest {
    pub crop_id: i64,
    pub weight_kg: f64,
}

impl CropRequest {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.weight_kg.is_finite() && self.weight_kg > 0.0 {
            Ok(())
        } else {
            Err(AnalysisError::InvalidWeight {
                crop_id: self.crop_id,
                weight_kg: self.weight_kg,
            })
        }
    }
}

/// Body of `POST /api/analyze`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeRequest {
    pub farmer_id: Option<i64>,
    pub farmer_lat: Option<f64>,
    pub farmer_lon: Option<f64>,
    #[serde(default)]
    pub crops: Vec<CropRequest>,
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Evaluation of one (crop, market) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketAnalysisResult {
    pub market_id: i64,
    pub market_name: String,
    pub location_name: String,
    pub location: GeoPoint,
    pub crop_id: i64,
    pub crop_name: String,
    pub weight_kg: f64,
    pub distance_km: f64,
    pub current_price_per_kg: f64,
    pub transport_cost: i64,
    pub spoilage_risk: SpoilageRisk,
    pub revenue: i64,
    pub expected_profit: i64,
}

impl MarketAnalysisResult {
    /// Values handed to persistence when the farmer accepts this pairing.
    pub fn confirmation_request(&self) -> ConfirmationRequest {
        ConfirmationRequest {
            market_id: self.market_id,
            crop_id: self.crop_id,
            weight_kg: Decimal::from_f64(self.weight_kg).unwrap_or(Decimal::ZERO),
            expected_profit: Decimal::from(self.expected_profit),
            transport_cost: Decimal::from(self.transport_cost),
            spoilage_risk: self.spoilage_risk,
        }
    }
}

/// A farmer-accepted recommendation, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmationRequest {
    pub market_id: i64,
    pub crop_id: i64,
    pub weight_kg: Decimal,
    pub expected_profit: Decimal,
    pub transport_cost: Decimal,
    pub spoilage_risk: SpoilageRisk,
}

/// A posted market demand with the distance from the farmer attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Opportunity {
    pub demand_id: i64,
    pub market_id: i64,
    pub market_name: String,
    pub location_name: String,
    pub location: GeoPoint,
    pub crop_id: i64,
    pub crop_name: String,
    pub price_per_kg: f64,
    pub quantity_needed_kg: f64,
    pub valid_until: DateTime<Utc>,
    pub distance_km: f64,
}
