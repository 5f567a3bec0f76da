pub mod geo;
pub mod opportunity;
pub mod ranker;
pub mod spoilage;
pub mod transport;

pub use geo::distance_km;
pub use opportunity::scan_opportunities;
pub use ranker::{AnalysisReport, DefaultedPrice, MarketRanker, MarketSnapshot, ReferenceData};
pub use spoilage::SpoilagePolicy;
pub use transport::TransportRates;

use serde::{Deserialize, Serialize};

/// Tunable constants of the market analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub transport: TransportRates,
    pub spoilage: SpoilagePolicy,
    /// Placeholder price used when a market has no price history for a crop.
    pub default_price_per_kg: f64,
    /// Maximum number of demand postings returned by an opportunity scan.
    pub opportunity_limit: i64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            transport: TransportRates::default(),
            spoilage: SpoilagePolicy::default(),
            default_price_per_kg: 50.0,
            opportunity_limit: 20,
        }
    }
}

/// Round to the nearest integer, halves towards positive infinity.
/// `0.49999999999999994` rounds to 0.
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Round a distance to one decimal place.
pub fn round_tenths(value: f64) -> f64 {
    round_half_up(value * 10.0) / 10.0
}
