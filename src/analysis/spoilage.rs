use serde::{Deserialize, Serialize};

use crate::errors::AnalysisError;
use crate::models::SpoilageRisk;

/// Transit-time based spoilage classification and the profit haircut
/// applied per risk bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpoilagePolicy {
    pub avg_speed_kmh: f64,
    /// Shelf-life percentage below which risk is low.
    pub low_threshold_pct: f64,
    /// Shelf-life percentage below which risk is medium.
    pub medium_threshold_pct: f64,
    pub medium_multiplier: f64,
    pub high_multiplier: f64,
}

impl Default for SpoilagePolicy {
    fn default() -> Self {
        Self {
            avg_speed_kmh: 40.0,
            low_threshold_pct: 10.0,
            medium_threshold_pct: 30.0,
            medium_multiplier: 0.9,
            high_multiplier: 0.7,
        }
    }
}

impl SpoilagePolicy {
    /// Classify the risk of hauling a crop `distance_km`.
    ///
    /// Thresholds are strict: exactly `low_threshold_pct` is medium and
    /// exactly `medium_threshold_pct` is high.
    pub fn classify(
        &self,
        crop_id: i64,
        distance_km: f64,
        shelf_life_days: i32,
    ) -> Result<SpoilageRisk, AnalysisError> {
        if shelf_life_days <= 0 {
            return Err(AnalysisError::InvalidShelfLife {
                crop_id,
                shelf_life_days,
            });
        }

        let travel_time_days = distance_km / self.avg_speed_kmh / 24.0;
        let risk_pct = (travel_time_days / f64::from(shelf_life_days)) * 100.0;

        let risk = if risk_pct < self.low_threshold_pct {
            SpoilageRisk::Low
        } else if risk_pct < self.medium_threshold_pct {
            SpoilageRisk::Medium
        } else {
            SpoilageRisk::High
        };

        Ok(risk)
    }

    pub fn multiplier(&self, risk: SpoilageRisk) -> f64 {
        match risk {
            SpoilageRisk::Low => 1.0,
            SpoilageRisk::Medium => self.medium_multiplier,
            SpoilageRisk::High => self.high_multiplier,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
