pub mod analysis;
pub mod confirmed;
pub mod crop;
pub mod farmer;
pub mod market;
pub mod profit;

pub use analysis::{
    AnalyzeRequest, ConfirmationRequest, CropRequest, MarketAnalysisResult, Opportunity,
    SpoilageRisk,
};
pub use confirmed::{ConfirmedMarket, ConfirmedStatus};
pub use crop::CropInfo;
pub use farmer::{AddCropRequest, Farmer, FarmerCrop};
pub use market::{MarketDemand, MarketInfo, PricePeriod, PricePoint, PriceQuote, PriceStats, TopMarket};
pub use profit::{DailyProfit, ProfitSummary, ProfitTotals, ProfitWindow};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

use crate::errors::AnalysisError;

// ---------------------------------------------------------------------------
// GeoPoint
// ---------------------------------------------------------------------------

/// A WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, FromRow)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Build a point, rejecting non-finite or out-of-range coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, AnalysisError> {
        let point = Self {
            latitude,
            longitude,
        };
        if point.is_valid() {
            Ok(point)
        } else {
            Err(AnalysisError::InvalidCoordinates {
                latitude,
                longitude,
            })
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_point_accepts_range_edges() {
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert!(GeoPoint::new(-90.0, -180.0).is_ok());
        assert!(GeoPoint::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn test_geo_point_rejects_out_of_range() {
        assert_eq!(
            GeoPoint::new(91.0, 10.0),
            Err(AnalysisError::InvalidCoordinates {
                latitude: 91.0,
                longitude: 10.0
            })
        );
        assert!(GeoPoint::new(10.0, -180.5).is_err());
        assert!(GeoPoint::new(f64::NAN, 10.0).is_err());
    }
}
