use serde::{Deserialize, Serialize};

/// Linear single-hop haulage tariff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransportRates {
    /// Currency units per km regardless of load.
    pub base_rate_per_km: f64,
    /// Additional currency units per kg per km.
    pub weight_factor_per_kg_km: f64,
}

impl Default for TransportRates {
    fn default() -> Self {
        Self {
            base_rate_per_km: 5.0,
            weight_factor_per_kg_km: 0.1,
        }
    }
}

impl TransportRates {
    /// `(base_rate + weight_factor * weight_kg) * distance_km`
    pub fn cost(&self, distance_km: f64, weight_kg: f64) -> f64 {
        (self.base_rate_per_km + self.weight_factor_per_kg_km * weight_kg) * distance_km
    }
}
